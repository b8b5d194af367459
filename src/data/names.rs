//! Code and label tables for Swiss accident data.

/// Canton abbreviation to canton name, spelled as in swissBOUNDARIES3D.
const CANTONS: &[(&str, &str)] = &[
    ("ZH", "Zürich"),
    ("GE", "Genève"),
    ("BE", "Bern"),
    ("BS", "Basel-Stadt"),
    ("TI", "Ticino"),
    ("VS", "Valais"),
    ("VD", "Vaud"),
    ("GR", "Graubünden"),
    ("LU", "Luzern"),
    ("TG", "Thurgau"),
    ("FR", "Fribourg"),
    ("SG", "St. Gallen"),
    ("SO", "Solothurn"),
    ("AG", "Aargau"),
    ("SZ", "Schwyz"),
    ("OW", "Obwalden"),
    ("AR", "Appenzell Ausserrhoden"),
    ("ZG", "Zug"),
    ("JU", "Jura"),
    ("BL", "Basel-Landschaft"),
    ("NE", "Neuchâtel"),
    ("AI", "Appenzell Innerrhoden"),
    ("NW", "Nidwalden"),
    ("SH", "Schaffhausen"),
    ("GL", "Glarus"),
    ("UR", "Uri"),
];

/// BFS municipality numbers of canton Basel-Stadt.
const MUNICIPALITIES: &[(&str, &str)] = &[
    ("2701", "Basel"),
    ("2702", "Bettingen"),
    ("2703", "Riehen"),
];

/// German accident type descriptions (Basel open data) to English labels.
const ACCIDENT_TYPES: &[(&str, &str)] = &[
    ("Schleuder- oder Selbstunfall", "Accident with skidding or self-accident"),
    ("Überholunfall oder Fahrstreifenwechsel", "Accident when overtaking or changing lanes"),
    ("Auffahrunfall", "Accident with rear-end collision"),
    ("Abbiegeunfall", "Accident when turning left or right"),
    ("Einbiegeunfall", "Accident when turning-into main road"),
    ("Andere", "Other"),
    ("Überqueren der Fahrbahn", "Accident when crossing the lane(s)"),
    ("Frontalkollision", "Accident with head-on collision"),
    ("Parkierunfall", "Accident when parking"),
    ("Fussgängerunfall", "Accident involving pedestrian(s)"),
    ("Tierunfall", "Accident involving animal(s)"),
];

#[inline]
fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn canton_name(code: &str) -> Option<&'static str> {
    lookup(CANTONS, code.trim())
}

/// Municipality codes may arrive as numbers ("2701.0") from numeric attribute columns.
pub fn municipality_name(code: &str) -> Option<&'static str> {
    let code = code.trim();
    let code = code.strip_suffix(".0").unwrap_or(code);
    lookup(MUNICIPALITIES, code)
}

/// English label for a German accident type; unknown descriptions pass through.
pub fn translate_accident_type(description: &str) -> &str {
    lookup(ACCIDENT_TYPES, description).unwrap_or(description)
}
