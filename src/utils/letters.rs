use std::collections::HashMap;
use once_cell::sync::Lazy;

/// Bulgarian tile distribution: (letter, tile count, point value).
/// Frequent letters are cheap, rare letters are expensive.
pub static TILE_DISTRIBUTION: &[(char, u8, u32)] = &[
    // 1 point
    ('А', 9, 1),
    ('О', 9, 1),
    ('Е', 8, 1),
    ('И', 8, 1),
    ('Т', 5, 1),
    ('Н', 4, 1),
    ('П', 4, 1),
    ('Р', 4, 1),
    ('С', 4, 1),
    // 2 points
    ('В', 4, 2),
    ('Д', 4, 2),
    ('М', 4, 2),
    ('Б', 3, 2),
    ('К', 3, 2),
    ('Л', 3, 2),
    // 3 points
    ('Г', 3, 3),
    ('Ъ', 2, 3),
    // 4 points
    ('Ж', 2, 4),
    ('З', 2, 4),
    // 5 points
    ('У', 3, 5),
    ('Ч', 2, 5),
    ('Я', 2, 5),
    ('Й', 1, 5),
    ('Х', 1, 5),
    // 8 points
    ('Ц', 1, 8),
    ('Ш', 1, 8),
    ('Ю', 1, 8),
    // 10 points
    ('Ф', 1, 10),
    ('Щ', 1, 10),
    ('Ь', 1, 10),
];

/// Letter to point value lookup built from the distribution table
pub static LETTER_VALUES: Lazy<HashMap<char, u32>> = Lazy::new(|| {
    TILE_DISTRIBUTION
        .iter()
        .map(|&(letter, _, points)| (letter, points))
        .collect()
});

/// Get the point value for a letter, or `None` if the letter has no tile.
/// Lower-case input is accepted.
pub fn letter_value(letter: char) -> Option<u32> {
    letter
        .to_uppercase()
        .next()
        .and_then(|upper| LETTER_VALUES.get(&upper).copied())
}

/// Total number of tiles in a fresh bag
pub fn total_tile_count() -> usize {
    TILE_DISTRIBUTION
        .iter()
        .map(|&(_, count, _)| count as usize)
        .sum()
}
