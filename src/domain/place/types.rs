//! Google place-type catalog, validation and fuzzy suggestions

use std::collections::{BTreeMap, BTreeSet, HashSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Suggestions returned per unknown type
pub const MAX_SUGGESTIONS: usize = 5;

/// Minimum normalized similarity for a suggestion
pub const SUGGESTION_CUTOFF: f64 = 0.6;

/// Filterable place types grouped by category
pub const PLACE_TYPES_BY_CATEGORY: &[(&str, &[&str])] = &[
    (
        "automotive",
        &[
            "car_dealer",
            "car_rental",
            "car_repair",
            "car_wash",
            "electric_vehicle_charging_station",
            "gas_station",
            "parking",
            "rest_stop",
        ],
    ),
    ("business", &["corporate_office", "farm", "ranch"]),
    (
        "culture",
        &[
            "art_gallery",
            "art_studio",
            "auditorium",
            "cultural_landmark",
            "historical_place",
            "monument",
            "museum",
            "performing_arts_theater",
            "sculpture",
        ],
    ),
    (
        "education",
        &[
            "library",
            "preschool",
            "primary_school",
            "school",
            "secondary_school",
            "university",
        ],
    ),
    (
        "entertainment_recreation",
        &[
            "amusement_center",
            "amusement_park",
            "aquarium",
            "banquet_hall",
            "bowling_alley",
            "casino",
            "community_center",
            "convention_center",
            "cultural_center",
            "dog_park",
            "event_venue",
            "hiking_area",
            "historical_landmark",
            "marina",
            "movie_rental",
            "movie_theater",
            "national_park",
            "night_club",
            "park",
            "tourist_attraction",
            "visitor_center",
            "wedding_venue",
            "zoo",
        ],
    ),
    ("facilities", &["public_bath", "public_bathroom", "stable"]),
    ("finance", &["accounting", "atm", "bank"]),
    (
        "food_drink",
        &[
            "american_restaurant",
            "bakery",
            "bar",
            "barbecue_restaurant",
            "brazilian_restaurant",
            "breakfast_restaurant",
            "brunch_restaurant",
            "cafe",
            "chinese_restaurant",
            "coffee_shop",
            "fast_food_restaurant",
            "french_restaurant",
            "greek_restaurant",
            "hamburger_restaurant",
            "ice_cream_shop",
            "indian_restaurant",
            "indonesian_restaurant",
            "italian_restaurant",
            "japanese_restaurant",
            "korean_restaurant",
            "lebanese_restaurant",
            "meal_delivery",
            "meal_takeaway",
            "mediterranean_restaurant",
            "mexican_restaurant",
            "middle_eastern_restaurant",
            "pizza_restaurant",
            "ramen_restaurant",
            "restaurant",
            "sandwich_shop",
            "seafood_restaurant",
            "spanish_restaurant",
            "steak_house",
            "sushi_restaurant",
            "thai_restaurant",
            "turkish_restaurant",
            "vegan_restaurant",
            "vegetarian_restaurant",
            "vietnamese_restaurant",
        ],
    ),
    (
        "government",
        &[
            "city_hall",
            "courthouse",
            "embassy",
            "fire_station",
            "local_government_office",
            "police",
            "post_office",
        ],
    ),
    (
        "health_wellness",
        &[
            "dental_clinic",
            "dentist",
            "doctor",
            "drugstore",
            "hospital",
            "medical_lab",
            "pharmacy",
            "physiotherapist",
            "spa",
        ],
    ),
    (
        "lodging",
        &[
            "bed_and_breakfast",
            "campground",
            "camping_cabin",
            "cottage",
            "extended_stay_hotel",
            "farmstay",
            "guest_house",
            "hostel",
            "hotel",
            "lodging",
            "motel",
            "private_guest_room",
            "resort_hotel",
            "rv_park",
        ],
    ),
    (
        "places_of_worship",
        &["church", "hindu_temple", "mosque", "synagogue"],
    ),
    (
        "services",
        &[
            "barber_shop",
            "beauty_salon",
            "cemetery",
            "child_care_agency",
            "consultant",
            "courier_service",
            "electrician",
            "florist",
            "funeral_home",
            "hair_care",
            "hair_salon",
            "insurance_agency",
            "laundry",
            "lawyer",
            "locksmith",
            "moving_company",
            "painter",
            "plumber",
            "real_estate_agency",
            "roofing_contractor",
            "storage",
            "tailor",
            "telecommunications_service_provider",
            "travel_agency",
            "veterinary_care",
        ],
    ),
    (
        "shopping",
        &[
            "auto_parts_store",
            "bicycle_store",
            "book_store",
            "cell_phone_store",
            "clothing_store",
            "convenience_store",
            "department_store",
            "discount_store",
            "electronics_store",
            "furniture_store",
            "gift_shop",
            "grocery_store",
            "hardware_store",
            "home_goods_store",
            "home_improvement_store",
            "jewelry_store",
            "liquor_store",
            "market",
            "pet_store",
            "shoe_store",
            "shopping_mall",
            "sporting_goods_store",
            "store",
            "supermarket",
            "wholesaler",
        ],
    ),
    (
        "sports",
        &[
            "athletic_field",
            "fitness_center",
            "golf_course",
            "gym",
            "playground",
            "ski_resort",
            "sports_club",
            "sports_complex",
            "stadium",
            "swimming_pool",
        ],
    ),
    (
        "transportation",
        &[
            "airport",
            "bus_station",
            "bus_stop",
            "ferry_terminal",
            "heliport",
            "light_rail_station",
            "park_and_ride",
            "subway_station",
            "taxi_stand",
            "train_station",
            "transit_depot",
            "transit_station",
            "truck_stop",
        ],
    ),
];

static ALL_PLACE_TYPES: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    PLACE_TYPES_BY_CATEGORY
        .iter()
        .flat_map(|(_, types)| types.iter().copied())
        .collect()
});

/// Lowercases, trims and replaces inner spaces with underscores
pub fn normalize_place_type(place_type: &str) -> String {
    place_type
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

pub fn is_known_place_type(place_type: &str) -> bool {
    ALL_PLACE_TYPES.contains(normalize_place_type(place_type).as_str())
}

fn category_types(category: &str) -> Option<&'static [&'static str]> {
    PLACE_TYPES_BY_CATEGORY
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, types)| *types)
}

/// Returns the category a place type belongs to
pub fn category_for_type(place_type: &str) -> Option<&'static str> {
    let normalized = normalize_place_type(place_type);
    PLACE_TYPES_BY_CATEGORY
        .iter()
        .find(|(_, types)| types.contains(&normalized.as_str()))
        .map(|(name, _)| *name)
}

/// Result of validating caller-supplied place types
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceTypeValidation {
    /// Known types, category names expanded, first occurrence wins
    pub valid: Vec<String>,
    /// Entries as supplied by the caller
    pub invalid: Vec<String>,
    pub suggestions: BTreeMap<String, Vec<String>>,
}

impl PlaceTypeValidation {
    pub fn all_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Human-readable warnings, one per invalid entry
    pub fn warnings(&self) -> Vec<String> {
        self.invalid
            .iter()
            .map(|invalid| match self.suggestions.get(invalid) {
                Some(suggestions) if !suggestions.is_empty() => format!(
                    "Invalid place type '{}'. Did you mean: {}?",
                    invalid,
                    suggestions.join(", ")
                ),
                _ => format!("Invalid place type '{}'", invalid),
            })
            .collect()
    }
}

/// Splits place types into valid and invalid, expanding category names
pub fn validate_place_types<S: AsRef<str>>(place_types: &[S]) -> PlaceTypeValidation {
    let mut validation = PlaceTypeValidation::default();
    let mut seen = HashSet::new();

    let mut push_valid = |validation: &mut PlaceTypeValidation, place_type: &str| {
        if seen.insert(place_type.to_string()) {
            validation.valid.push(place_type.to_string());
        }
    };

    for raw in place_types {
        let raw = raw.as_ref();
        let normalized = normalize_place_type(raw);

        if ALL_PLACE_TYPES.contains(normalized.as_str()) {
            push_valid(&mut validation, &normalized);
        } else if let Some(types) = category_types(&normalized) {
            for place_type in types {
                push_valid(&mut validation, place_type);
            }
        } else {
            let suggestions = suggest_place_types(&normalized, MAX_SUGGESTIONS);
            if !suggestions.is_empty() {
                validation.suggestions.insert(raw.to_string(), suggestions);
            }
            validation.invalid.push(raw.to_string());
        }
    }

    validation
}

/// Known types closest to `input`, best match first
pub fn suggest_place_types(input: &str, max_suggestions: usize) -> Vec<String> {
    let normalized = normalize_place_type(input);

    if ALL_PLACE_TYPES.contains(normalized.as_str()) {
        return vec![normalized];
    }

    let mut scored: Vec<(f64, &str)> = ALL_PLACE_TYPES
        .iter()
        .map(|candidate| (similarity(&normalized, candidate), *candidate))
        .filter(|(score, _)| *score >= SUGGESTION_CUTOFF)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));

    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / max_len as f64
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Catalog excerpt returned for discovery
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceTypeListing {
    pub categories: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_categories: Vec<String>,
    pub total_types: usize,
}

/// Lists the catalog, optionally restricted to some categories
pub fn list_place_types<S: AsRef<str>>(categories: Option<&[S]>) -> PlaceTypeListing {
    let mut listing = PlaceTypeListing::default();

    match categories {
        None => {
            for (name, types) in PLACE_TYPES_BY_CATEGORY {
                listing
                    .categories
                    .insert(name.to_string(), types.iter().map(|t| t.to_string()).collect());
            }
        }
        Some(requested) => {
            for category in requested {
                let normalized = normalize_place_type(category.as_ref());
                match category_types(&normalized) {
                    Some(types) => {
                        listing
                            .categories
                            .insert(normalized, types.iter().map(|t| t.to_string()).collect());
                    }
                    None => listing.unknown_categories.push(category.as_ref().to_string()),
                }
            }
        }
    }

    listing.total_types = listing.categories.values().map(Vec::len).sum();
    listing
}
