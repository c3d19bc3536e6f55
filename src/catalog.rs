// Static content for the builder: deities, temple illustrations, background gradients.
use crate::model::DeityVisual;

pub const DEITIES: &[DeityVisual] = &[
    DeityVisual { key: "ganesh", name: "Ganesha", emoji: "🐘" },
    DeityVisual { key: "vishnu", name: "Vishnu", emoji: "🪷" },
    DeityVisual { key: "shiva", name: "Shiva", emoji: "🔱" },
    DeityVisual { key: "lakshmi", name: "Lakshmi", emoji: "🌸" },
    DeityVisual { key: "hanuman", name: "Hanuman", emoji: "🐒" },
    DeityVisual { key: "krishna", name: "Krishna", emoji: "🪈" },
    DeityVisual { key: "durga", name: "Durga", emoji: "🦁" },
    DeityVisual { key: "saraswati", name: "Saraswati", emoji: "🎶" },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TempleStyle {
    pub key: &'static str,
    pub name: &'static str,
    pub image: &'static str,
}

pub const TEMPLE_STYLES: &[TempleStyle] = &[
    TempleStyle { key: "nagara", name: "Nagara", image: "assets/temples/nagara.png" },
    TempleStyle { key: "dravida", name: "Dravida", image: "assets/temples/dravida.png" },
    TempleStyle { key: "vesara", name: "Vesara", image: "assets/temples/vesara.png" },
];

pub const GRADIENTS: &[(&str, &[&str])] = &[
    ("Saffron", &["#ffcf71", "#f5802c"]),
    ("Dusk", &["#2b1055", "#d16ba5"]),
    ("Lotus", &["#fde2e4", "#f9a8d4", "#be185d"]),
    ("Ganga", &["#e0f2fe", "#38bdf8", "#1e3a8a"]),
];

pub fn deity(key: &str) -> Option<&'static DeityVisual> {
    DEITIES.iter().find(|d| d.key == key)
}

pub fn style(key: &str) -> &'static TempleStyle {
    TEMPLE_STYLES
        .iter()
        .find(|s| s.key == key)
        .unwrap_or(&TEMPLE_STYLES[0])
}

/// CSS `linear-gradient` for the given color stops.
pub fn gradient_css(stops: &[String]) -> String {
    match stops {
        [] => "#161b22".to_string(),
        [only] => only.clone(),
        _ => format!("linear-gradient(180deg, {})", stops.join(", ")),
    }
}
