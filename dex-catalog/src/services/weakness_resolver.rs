//! Category weakness table
//!
//! Static lookup only; unknown categories contribute nothing.

/// Categories each category is weak against
pub fn weak_against(category: &str) -> &'static [&'static str] {
    match category {
        "normal" => &["fighting"],
        "fire" => &["water", "ground", "rock"],
        "water" => &["electric", "grass"],
        "electric" => &["ground"],
        "grass" => &["fire", "ice", "poison", "flying", "bug"],
        "ice" => &["fire", "fighting", "rock", "steel"],
        "fighting" => &["flying", "psychic", "fairy"],
        "poison" => &["ground", "psychic"],
        "ground" => &["water", "grass", "ice"],
        "flying" => &["electric", "ice", "rock"],
        "psychic" => &["bug", "ghost", "dark"],
        "bug" => &["fire", "flying", "rock"],
        "rock" => &["water", "grass", "fighting", "ground", "steel"],
        "ghost" => &["ghost", "dark"],
        "dragon" => &["ice", "dragon", "fairy"],
        "dark" => &["fighting", "bug", "fairy"],
        "steel" => &["fire", "fighting", "ground"],
        "fairy" => &["poison", "steel"],
        _ => &[],
    }
}

/// Union of weaknesses over `categories`, deduplicated in first-seen order
pub fn weaknesses_of<I, S>(categories: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut weaknesses: Vec<String> = Vec::new();
    for category in categories {
        let category = category.as_ref().trim().to_ascii_lowercase();
        for weakness in weak_against(&category) {
            if !weaknesses.iter().any(|w| w == weakness) {
                weaknesses.push((*weakness).to_string());
            }
        }
    }
    weaknesses
}
