//! City → district lookup.

/// District recorded when a city is not in the table.
pub const UNKNOWN_DISTRICT: &str = "Unknown";

/// Known cities (and district names) with their districts.
const CITY_DISTRICTS: &[(&str, &str)] = &[
    ("Kathmandu", "Kathmandu"),
    ("Lalitpur", "Lalitpur"),
    ("Bhaktapur", "Bhaktapur"),
    ("Itahari", "Sunsari"),
    ("Dharan", "Sunsari"),
    ("Sunsari", "Sunsari"),
    ("Biratnagar", "Morang"),
    ("Morang", "Morang"),
    ("Butwal", "Rupandehi"),
    ("Rupandehi", "Rupandehi"),
    ("Ghorahi", "Dang"),
    ("Dang", "Dang"),
    ("Tulsipur", "Dang"),
    ("Dhangadhi", "Kailali"),
    ("Kailali", "Kailali"),
    ("Janakpur", "Dhanusha"),
    ("Dhanusha", "Dhanusha"),
    ("Birgunj", "Parsa"),
    ("Parsa", "Parsa"),
    ("Nepalgunj", "Banke"),
    ("Banke", "Banke"),
    ("Birtamod", "Jhapa"),
    ("Mechinagar", "Jhapa"),
    ("Damak", "Jhapa"),
    ("Jhapa", "Jhapa"),
    ("Pokhara", "Kaski"),
    ("Kaski", "Kaski"),
    ("Chitawan", "Chitawan"),
    ("Bharatpur", "Chitawan"),
];

/// District for a city.
///
/// Exact (case-insensitive) lookup first, then containment in either
/// direction to absorb variants like "Kathmandu Metropolitan" or "Pokhar".
/// The first table entry that matches wins.
pub fn district_for_city(city: &str) -> &'static str {
    let city = city.trim().to_lowercase();
    if city.is_empty() {
        return UNKNOWN_DISTRICT;
    }

    if let Some((_, district)) = CITY_DISTRICTS
        .iter()
        .find(|(known, _)| known.to_lowercase() == city)
    {
        return district;
    }

    CITY_DISTRICTS
        .iter()
        .find(|(known, _)| {
            let known = known.to_lowercase();
            city.contains(&known) || known.contains(&city)
        })
        .map(|(_, district)| *district)
        .unwrap_or(UNKNOWN_DISTRICT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup() {
        assert_eq!(district_for_city("Dharan"), "Sunsari");
        assert_eq!(district_for_city("bharatpur"), "Chitawan");
        assert_eq!(district_for_city("Kathmandu"), "Kathmandu");
    }

    #[test]
    fn test_partial_lookup() {
        assert_eq!(district_for_city("Kathmandu Metropolitan City"), "Kathmandu");
        assert_eq!(district_for_city("Pokhar"), "Kaski");
        assert_eq!(district_for_city("Birtamod Bazar"), "Jhapa");
    }

    #[test]
    fn test_unknown() {
        assert_eq!(district_for_city("Jumla"), UNKNOWN_DISTRICT);
        assert_eq!(district_for_city(""), UNKNOWN_DISTRICT);
    }
}
