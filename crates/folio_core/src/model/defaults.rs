//! Compiled-in seed content.
//!
//! Used when the remote row is missing and as the base of every merge.

use super::document::{
    Album, Contact, ElementStyle, ElementStyles, HomeContent, PageContent, Photo,
    PortfolioDocument, Profile, Testimonial, TextWork, ThemeColors, ThemeConfig, ThemeFontSizes,
    ThemeFonts,
};

const SERIF_STACK: &str = "\"Cormorant Garamond\", serif";
const SANS_STACK: &str = "\"Montserrat\", sans-serif";

/// Returns the default document shipped with the site.
pub fn initial_document() -> PortfolioDocument {
    PortfolioDocument {
        profile: default_profile(),
        albums: default_albums(),
        writings: default_writings(),
        testimonials: vec![Testimonial {
            id: "t1".to_string(),
            name: "Ana Costa".to_string(),
            role: Some("Editora da Revista Viver".to_string()),
            text: "O trabalho do Pedro captura a alma do momento. Suas fotos ilustraram nossa \
                   matéria de capa com uma sensibilidade ímpar."
                .to_string(),
            avatar: "https://randomuser.me/api/portraits/women/44.jpg".to_string(),
        }],
        theme: default_theme(),
        home: HomeContent {
            hero_title: "A Arte de Observar".to_string(),
            hero_subtitle: "Fotografia & Poesia".to_string(),
            welcome_label: "Bem-vindo".to_string(),
            intro_title: "\"Não fotografamos o que vemos, fotografamos o que sentimos.\""
                .to_string(),
            intro_description: "Este espaço é dedicado aos fragmentos de tempo que coleciono. \
                                Seja através da lente da câmera ou da tinta da caneta, cada obra \
                                aqui exposta é um convite para desacelerar e enxergar a beleza \
                                nos detalhes."
                .to_string(),
        },
        portfolio_page: PageContent {
            title: "Portfólio".to_string(),
            description: "Coleções de imagens que contam histórias sobre luz, tempo e lugar."
                .to_string(),
        },
        writings_page: PageContent {
            title: "Escritos".to_string(),
            description: "Crônicas, poesias e ensaios sobre o cotidiano.".to_string(),
        },
    }
}

pub fn default_theme() -> ThemeConfig {
    ThemeConfig {
        colors: ThemeColors {
            background: "#fafaf9".to_string(),
            text: "#1c1917".to_string(),
            accent: "#292524".to_string(),
            secondary: "#78716c".to_string(),
            surface: None,
            testimonial_background: None,
            testimonial_role: None,
        },
        fonts: ThemeFonts {
            serif: SERIF_STACK.to_string(),
            sans: SANS_STACK.to_string(),
        },
        font_sizes: ThemeFontSizes {
            base: "18px".to_string(),
            title: "64px".to_string(),
            subtitle: "14px".to_string(),
            caption: "16px".to_string(),
        },
        element_styles: ElementStyles {
            title: element(SERIF_STACK, "#1c1917"),
            subtitle: element(SERIF_STACK, "#78716c"),
            text: element(SERIF_STACK, "#1c1917"),
            caption: element(SANS_STACK, "#ffffff"),
        },
        hero_image: Some(
            "https://images.unsplash.com/photo-1464822759023-fed622ff2c3b?auto=format&fit=crop&q=80"
                .to_string(),
        ),
    }
}

fn element(font: &str, color: &str) -> ElementStyle {
    ElementStyle {
        font: font.to_string(),
        color: color.to_string(),
    }
}

fn default_profile() -> Profile {
    Profile {
        name: "Pedro Henrique".to_string(),
        role: "Fotógrafo & Escritor".to_string(),
        bio: vec![
            "Acredito que a fotografia e a escrita são duas faces da mesma moeda: a arte de \
             observar e eternizar o efêmero."
                .to_string(),
            "Com 10 anos de experiência em fotografia documental e natureza, dedico minha vida a \
             construir pontes entre o visível e o sensível."
                .to_string(),
            "Atualmente resido em São Paulo, mas meu espírito vive na estrada.".to_string(),
        ],
        contact: Contact {
            email: "contato@pedrohenrique.com".to_string(),
            instagram: "@pedrohenrique.art".to_string(),
            linkedin: Some("linkedin.com/in/pedrohenrique".to_string()),
        },
        profile_image: "https://picsum.photos/id/64/800/800".to_string(),
    }
}

fn default_albums() -> Vec<Album> {
    vec![
        album(
            "natureza-silenciosa",
            "Natureza Silenciosa",
            "Um estudo sobre a quietude das paisagens intocadas e a luz da manhã.",
            "2023",
            10,
            &[
                ("n1", 10, "Floresta ao amanhecer", "O despertar da floresta"),
                ("n2", 11, "Lago calmo", "Espelho d'água"),
                ("n3", 12, "Praia deserta", "Areias do tempo"),
                ("n4", 13, "Montanhas", "Horizonte distante"),
            ],
        ),
        album(
            "cotidiano-urbano",
            "Cotidiano Urbano",
            "A poesia do caos nas grandes metrópoles. Preto e branco e contrastes.",
            "2024",
            20,
            &[
                ("u1", 20, "Mesa de trabalho", "Ferramentas do dia"),
                ("u2", 21, "Sapatos", "Passos apressados"),
                ("u3", 22, "Rua vazia", "Solidão noturna"),
            ],
        ),
        album(
            "retratos",
            "Alma & Face",
            "Retratos que buscam capturar a essência além da aparência.",
            "2022 - Atual",
            64,
            &[
                ("r1", 64, "Retrato feminino", "Olhar sereno"),
                ("r2", 65, "Rosto expressivo", "Marcas do tempo"),
            ],
        ),
    ]
}

fn album(
    id: &str,
    title: &str,
    description: &str,
    date: &str,
    cover_id: u32,
    photos: &[(&str, u32, &str, &str)],
) -> Album {
    Album {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        date: date.to_string(),
        cover_image: format!("https://picsum.photos/id/{cover_id}/800/600"),
        photos: photos
            .iter()
            .map(|(photo_id, image_id, alt, caption)| Photo {
                id: (*photo_id).to_string(),
                src: format!("https://picsum.photos/id/{image_id}/1200/800"),
                alt: (*alt).to_string(),
                caption: Some((*caption).to_string()),
                ..Photo::default()
            })
            .collect(),
    }
}

fn default_writings() -> Vec<TextWork> {
    vec![
        TextWork {
            id: "o-tempo-das-pedras".to_string(),
            title: "O Tempo das Pedras".to_string(),
            category: "Poesia".to_string(),
            excerpt: "Uma reflexão poética sobre a paciência geológica e a pressa humana."
                .to_string(),
            content: "<p>As pedras não têm pressa.</p>\
                      <p>Eu quisera ter a paciência do granito.</p>"
                .to_string(),
            date: "12 Mar 2024".to_string(),
            cover_image: Some("https://picsum.photos/id/16/800/400".to_string()),
        },
        TextWork {
            id: "cafe-frio".to_string(),
            title: "Café Frio e Memórias Mornas".to_string(),
            category: "Crônica".to_string(),
            excerpt: "Sobre os encontros que não aconteceram e as xícaras que ficaram sobre a mesa."
                .to_string(),
            content: "<p>Há uma tristeza peculiar em uma xícara de café esquecida.</p>".to_string(),
            date: "05 Fev 2024".to_string(),
            cover_image: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::initial_document;

    #[test]
    fn initial_document_has_unique_album_and_photo_ids() {
        let doc = initial_document();
        let mut ids = doc.albums.iter().map(|a| a.id.as_str()).collect::<Vec<_>>();
        ids.extend(doc.albums.iter().flat_map(|a| a.photos.iter().map(|p| p.id.as_str())));
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn initial_document_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(initial_document()).unwrap();
        assert!(value["theme"]["fontSizes"].is_object());
        assert!(value["portfolioPage"]["title"].is_string());
        assert!(value["profile"]["profileImage"].is_string());
    }
}
