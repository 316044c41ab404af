// Colour cycle shared by chart datasets and map polylines
use serde::Deserialize;

const DEFAULT_COLORS: [&str; 4] = ["#0f0b60", "#d90429", "#064832", "#ffc300"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }

    pub fn color(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl From<Vec<String>> for Palette {
    fn from(colors: Vec<String>) -> Self {
        Self::new(colors)
    }
}
