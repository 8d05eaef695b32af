//! Admin draft operations over document sections.
//!
//! # Responsibility
//! - Provide the list edits behind the admin panel (albums, photos,
//!   writings, testimonials) on owned drafts.
//!
//! # Invariants
//! - Generated ids are unique per call.
//! - Edits addressing an unknown id are no-ops reported as `false`.

use crate::image::{with_focal_point, FocalPoint};
use crate::model::document::{Album, Photo, Testimonial, TextWork, WRITING_CATEGORIES};
use chrono::{Datelike, Utc};
use uuid::Uuid;

const PLACEHOLDER_COVER: &str = "https://picsum.photos/800/600";
const PLACEHOLDER_PHOTO: &str = "https://picsum.photos/1200/800";

/// Editable album fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumField {
    Title,
    Description,
    Date,
    CoverImage,
}

/// Editable photo fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoField {
    Src,
    Alt,
    Caption,
    PdfUrl,
}

/// Editable writing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritingField {
    Title,
    Category,
    Excerpt,
    Content,
    Date,
    CoverImage,
}

/// Editable testimonial fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestimonialField {
    Name,
    Role,
    Text,
    Avatar,
}

/// Result of one file in a bulk upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPhoto {
    pub url: String,
    pub file_name: String,
}

/// Returns `{prefix}-{uuid}`.
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Inserts a placeholder album at the front and returns its id.
pub fn add_album(albums: &mut Vec<Album>) -> String {
    let album = Album {
        id: generate_id("album"),
        title: "Novo Álbum".to_string(),
        description: "Descrição...".to_string(),
        date: Utc::now().year().to_string(),
        cover_image: PLACEHOLDER_COVER.to_string(),
        photos: Vec::new(),
    };
    let id = album.id.clone();
    albums.insert(0, album);
    id
}

pub fn remove_album(albums: &mut Vec<Album>, album_id: &str) -> bool {
    let before = albums.len();
    albums.retain(|album| album.id != album_id);
    albums.len() != before
}

pub fn update_album_field(
    albums: &mut [Album],
    album_id: &str,
    field: AlbumField,
    value: impl Into<String>,
) -> bool {
    let Some(album) = albums.iter_mut().find(|album| album.id == album_id) else {
        return false;
    };
    let value = value.into();
    match field {
        AlbumField::Title => album.title = value,
        AlbumField::Description => album.description = value,
        AlbumField::Date => album.date = value,
        AlbumField::CoverImage => album.cover_image = value,
    }
    true
}

/// Appends a placeholder photo and returns its id.
pub fn add_photo(albums: &mut [Album], album_id: &str) -> Option<String> {
    let album = albums.iter_mut().find(|album| album.id == album_id)?;
    let photo = Photo {
        id: generate_id("p"),
        src: PLACEHOLDER_PHOTO.to_string(),
        alt: "Nova foto".to_string(),
        caption: Some(String::new()),
        ..Photo::default()
    };
    let id = photo.id.clone();
    album.photos.push(photo);
    Some(id)
}

pub fn remove_photo(albums: &mut [Album], album_id: &str, photo_id: &str) -> bool {
    let Some(album) = albums.iter_mut().find(|album| album.id == album_id) else {
        return false;
    };
    let before = album.photos.len();
    album.photos.retain(|photo| photo.id != photo_id);
    album.photos.len() != before
}

/// Sets one photo field; an empty value clears optional fields.
pub fn update_photo_field(
    albums: &mut [Album],
    album_id: &str,
    photo_id: &str,
    field: PhotoField,
    value: impl Into<String>,
) -> bool {
    let Some(photo) = find_photo(albums, album_id, photo_id) else {
        return false;
    };
    let value = value.into();
    let optional = (!value.is_empty()).then(|| value.clone());
    match field {
        PhotoField::Src => photo.src = value,
        PhotoField::Alt => photo.alt = value,
        PhotoField::Caption => photo.caption = optional,
        PhotoField::PdfUrl => photo.pdf_url = optional,
    }
    true
}

/// Re-encodes a photo's `src` with `point`.
pub fn set_photo_focal_point(
    albums: &mut [Album],
    album_id: &str,
    photo_id: &str,
    point: FocalPoint,
) -> bool {
    let Some(photo) = find_photo(albums, album_id, photo_id) else {
        return false;
    };
    if photo.src.is_empty() {
        return false;
    }
    photo.src = with_focal_point(&photo.src, point);
    true
}

/// Appends photos for successful uploads; failed ones (`None`) are skipped.
///
/// Returns the number of photos added.
pub fn append_photos(
    albums: &mut [Album],
    album_id: &str,
    uploads: impl IntoIterator<Item = Option<UploadedPhoto>>,
) -> usize {
    let Some(album) = albums.iter_mut().find(|album| album.id == album_id) else {
        return 0;
    };
    let before = album.photos.len();
    album
        .photos
        .extend(uploads.into_iter().flatten().map(|upload| Photo {
            id: generate_id("p"),
            src: upload.url,
            alt: alt_from_file_name(&upload.file_name),
            caption: Some(String::new()),
            ..Photo::default()
        }));
    album.photos.len() - before
}

/// Inserts a draft writing at the front and returns its id.
pub fn add_writing(writings: &mut Vec<TextWork>) -> String {
    let work = TextWork {
        id: generate_id("writing"),
        title: "Novo Texto".to_string(),
        category: WRITING_CATEGORIES[0].to_string(),
        excerpt: "Resumo...".to_string(),
        content: "<p>Conteúdo do texto...</p>".to_string(),
        date: Utc::now().format("%d/%m/%Y").to_string(),
        cover_image: None,
    };
    let id = work.id.clone();
    writings.insert(0, work);
    id
}

pub fn remove_writing(writings: &mut Vec<TextWork>, writing_id: &str) -> bool {
    let before = writings.len();
    writings.retain(|work| work.id != writing_id);
    writings.len() != before
}

/// Sets one writing field; an empty cover image clears it.
pub fn update_writing_field(
    writings: &mut [TextWork],
    writing_id: &str,
    field: WritingField,
    value: impl Into<String>,
) -> bool {
    let Some(work) = writings.iter_mut().find(|work| work.id == writing_id) else {
        return false;
    };
    let value = value.into();
    match field {
        WritingField::Title => work.title = value,
        WritingField::Category => work.category = value,
        WritingField::Excerpt => work.excerpt = value,
        WritingField::Content => work.content = value,
        WritingField::Date => work.date = value,
        WritingField::CoverImage => work.cover_image = (!value.is_empty()).then_some(value),
    }
    true
}

/// Appends a placeholder testimonial and returns its id.
pub fn add_testimonial(testimonials: &mut Vec<Testimonial>) -> String {
    let testimonial = Testimonial {
        id: generate_id("t"),
        name: "Novo Nome".to_string(),
        role: Some("Cargo".to_string()),
        text: "Depoimento...".to_string(),
        avatar: String::new(),
    };
    let id = testimonial.id.clone();
    testimonials.push(testimonial);
    id
}

pub fn remove_testimonial(testimonials: &mut Vec<Testimonial>, testimonial_id: &str) -> bool {
    let before = testimonials.len();
    testimonials.retain(|t| t.id != testimonial_id);
    testimonials.len() != before
}

/// Sets one testimonial field; an empty role clears it.
pub fn update_testimonial_field(
    testimonials: &mut [Testimonial],
    testimonial_id: &str,
    field: TestimonialField,
    value: impl Into<String>,
) -> bool {
    let Some(testimonial) = testimonials.iter_mut().find(|t| t.id == testimonial_id) else {
        return false;
    };
    let value = value.into();
    match field {
        TestimonialField::Name => testimonial.name = value,
        TestimonialField::Role => testimonial.role = (!value.is_empty()).then_some(value),
        TestimonialField::Text => testimonial.text = value,
        TestimonialField::Avatar => testimonial.avatar = value,
    }
    true
}

fn find_photo<'a>(
    albums: &'a mut [Album],
    album_id: &str,
    photo_id: &str,
) -> Option<&'a mut Photo> {
    albums
        .iter_mut()
        .find(|album| album.id == album_id)?
        .photos
        .iter_mut()
        .find(|photo| photo.id == photo_id)
}

fn alt_from_file_name(file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or_default().trim();
    if stem.is_empty() {
        "Foto".to_string()
    } else {
        stem.to_string()
    }
}
