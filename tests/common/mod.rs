#![allow(dead_code)]

use seimei::strokes::StrokeTable;

/// Small synthetic dictionary (old-form counts) shared by the grade tests.
pub const DICTIONARY: &[(char, u32)] = &[
    ('田', 5),
    ('中', 4),
    ('太', 4),
    ('郎', 14),
    ('林', 8),
    ('佐', 7),
    ('木', 4),
    ('由', 5),
    ('美', 9),
    ('子', 3),
    ('一', 1),
    ('高', 10),
    ('崎', 11),
    ('甲', 30),
    ('乙', 33),
];

pub fn table() -> StrokeTable {
    StrokeTable::builder()
        .dictionary(DICTIONARY.iter().copied())
        .build()
}

pub const DICTIONARY_CSV: &str = "kanji,strokes_old,notes\n田,5,\n中,4,\n太,4,\n郎,14,\n林,8,\n浩,10,\n";
