// src/context/brussels.rs
// DOCUMENTATION: Brussels city declaration
// PURPOSE: The reference city context; swap this module to rank another city

use crate::models::DistrictTier::*;

use super::{AreaSpec, BoundingBox, CityConfig, GuideEntry, StreetSpec};

/// The Brussels-Capital Region context
/// DOCUMENTATION: Nineteen communes, the Grand Place tourist epicenter, the
/// European Quarter expat bubble, and the diaspora geography around
/// Matongé, Chaussée de Haecht and the canal communes.
pub fn brussels_config() -> CityConfig {
    CityConfig {
        city_name: "Brussels".to_string(),
        country: "Belgium".to_string(),
        center: (50.8503, 4.3517),
        default_zoom: 13,

        bounding_box: BoundingBox {
            min_lat: 50.7640,
            max_lat: 50.9220,
            min_lng: 4.2430,
            max_lng: 4.4860,
        },

        tourist_epicenter: (50.8467, 4.3525),
        tourist_epicenter_name: "Grand Place".to_string(),
        tourist_trap_neighborhood: Some("Rue des Bouchers".to_string()),

        expat_center: (50.8427, 4.3827),
        expat_center_name: "European Quarter".to_string(),

        // The 19 Brussels communes
        districts: vec![
            AreaSpec::new("Anderlecht", 50.8333, 4.3072, Underexplored),
            AreaSpec::new("Auderghem", 50.8167, 4.4333, LocalFoodie),
            AreaSpec::new("Berchem-Sainte-Agathe", 50.8667, 4.2917, Underexplored),
            AreaSpec::new("Bruxelles", 50.8503, 4.3517, TouristHeavy),
            AreaSpec::new("Etterbeek", 50.8333, 4.3833, ExpatBubble),
            AreaSpec::new("Evere", 50.8667, 4.4000, Underexplored),
            AreaSpec::new("Forest", 50.8103, 4.3242, Underexplored),
            AreaSpec::new("Ganshoren", 50.8750, 4.3083, Underexplored),
            AreaSpec::new("Ixelles", 50.8275, 4.3697, Mixed),
            AreaSpec::new("Jette", 50.8792, 4.3250, Underexplored),
            AreaSpec::new("Koekelberg", 50.8625, 4.3292, Underexplored),
            AreaSpec::new("Molenbeek-Saint-Jean", 50.8547, 4.3286, DiasporaHub),
            AreaSpec::new("Saint-Gilles", 50.8261, 4.3456, DiasporaHub),
            AreaSpec::new("Saint-Josse-ten-Noode", 50.8553, 4.3703, DiasporaHub),
            AreaSpec::new("Schaerbeek", 50.8653, 4.3778, DiasporaHub),
            AreaSpec::new("Uccle", 50.8000, 4.3333, LocalFoodie),
            AreaSpec::new("Watermael-Boitsfort", 50.7958, 4.4125, LocalFoodie),
            AreaSpec::new("Woluwe-Saint-Lambert", 50.8417, 4.4333, LocalFoodie),
            AreaSpec::new("Woluwe-Saint-Pierre", 50.8333, 4.4500, LocalFoodie),
        ],

        // Finer-grained neighborhoods; radii tuned so circles never overlap
        neighborhoods: vec![
            AreaSpec::new("Matongé", 50.8295, 4.3680, LocalFoodie)
                .with_affinity(&["Congolese", "African"])
                .with_radius(0.15),
            AreaSpec::new("Châtelain", 50.8235, 4.3600, LocalFoodie)
                .with_affinity(&["French", "Belgian", "Brunch"]),
            AreaSpec::new("Sainte-Catherine", 50.8511, 4.3461, LocalFoodie)
                .with_affinity(&["Seafood", "Belgian"])
                .with_radius(0.12),
            AreaSpec::new("Marolles", 50.8389, 4.3444, LocalFoodie)
                .with_affinity(&["Belgian"])
                .with_radius(0.4),
            AreaSpec::new("Rue des Bouchers", 50.8478, 4.3544, TouristTrap).with_radius(0.12),
            AreaSpec::new("Grand Place", 50.8467, 4.3525, TouristTrap).with_radius(0.05),
            AreaSpec::new("European Quarter", 50.8427, 4.3827, ExpatBubble).with_radius(0.5),
            AreaSpec::new("Flagey", 50.8275, 4.3720, LocalFoodie)
                .with_affinity(&["Belgian", "Brunch"])
                .with_radius(0.2),
            AreaSpec::new("Parvis Saint-Gilles", 50.8270, 4.3465, LocalFoodie)
                .with_affinity(&["French", "Belgian"])
                .with_radius(0.25),
            AreaSpec::new("Dansaert", 50.8505, 4.3430, LocalFoodie)
                .with_affinity(&["Belgian", "French"])
                .with_radius(0.10),
        ],

        // Diaspora food streets with the communities they anchor
        diaspora_streets: vec![
            StreetSpec::new("Chaussée de Gand", 50.8570, 4.3320, 0.30, &["Moroccan"]),
            StreetSpec::new(
                "Rue de Brabant",
                50.8555,
                4.3595,
                0.25,
                &["Moroccan", "Middle Eastern"],
            ),
            StreetSpec::new(
                "Foodmet/Clemenceau",
                50.8400,
                4.3180,
                0.25,
                &["Moroccan", "African"],
            ),
            StreetSpec::new("Chaussée de Haecht", 50.8570, 4.3680, 0.30, &["Turkish"]),
            StreetSpec::new(
                "Chaussée de Wavre (Matongé)",
                50.8300,
                4.3690,
                0.15,
                &["Congolese", "African"],
            ),
            StreetSpec::new(
                "Galerie d'Ixelles",
                50.8295,
                4.3680,
                0.08,
                &["Congolese", "African"],
            ),
            StreetSpec::new("Rue de Flandre", 50.8530, 4.3450, 0.15, &["Belgian"]),
            StreetSpec::new(
                "Parvis de Saint-Gilles",
                50.8265,
                4.3470,
                0.12,
                &["Belgian", "French"],
            ),
        ],

        // District-tier weight for the authentic-district fry-shop signal
        tier_weights: vec![
            (TouristHeavy, 0.2),
            (TouristTrap, 0.0),
            (Mixed, 0.5),
            (LocalFoodie, 0.7),
            (DiasporaHub, 0.8),
            (Underexplored, 0.9),
            (ExpatBubble, 0.3),
        ],

        // Cuisine x commune authenticity: where each community historically eats
        diaspora_authenticity: vec![
            (
                "Congolese".to_string(),
                vec![
                    ("Ixelles".to_string(), 1.0),
                    ("Saint-Gilles".to_string(), 0.7),
                    ("Bruxelles".to_string(), 0.5),
                ],
            ),
            (
                "African".to_string(),
                vec![
                    ("Ixelles".to_string(), 0.9),
                    ("Saint-Gilles".to_string(), 0.7),
                    ("Molenbeek-Saint-Jean".to_string(), 0.6),
                ],
            ),
            (
                "Moroccan".to_string(),
                vec![
                    ("Molenbeek-Saint-Jean".to_string(), 1.0),
                    ("Schaerbeek".to_string(), 0.8),
                    ("Saint-Josse-ten-Noode".to_string(), 0.8),
                    ("Anderlecht".to_string(), 0.7),
                    ("Bruxelles".to_string(), 0.4),
                ],
            ),
            (
                "Turkish".to_string(),
                vec![
                    ("Schaerbeek".to_string(), 1.0),
                    ("Saint-Josse-ten-Noode".to_string(), 0.9),
                    ("Bruxelles".to_string(), 0.3),
                ],
            ),
            (
                "Syrian".to_string(),
                vec![
                    ("Saint-Josse-ten-Noode".to_string(), 0.8),
                    ("Schaerbeek".to_string(), 0.7),
                ],
            ),
            (
                "Lebanese".to_string(),
                vec![
                    ("Ixelles".to_string(), 0.7),
                    ("Bruxelles".to_string(), 0.5),
                ],
            ),
            (
                "Middle Eastern".to_string(),
                vec![
                    ("Saint-Josse-ten-Noode".to_string(), 0.7),
                    ("Schaerbeek".to_string(), 0.6),
                    ("Bruxelles".to_string(), 0.4),
                ],
            ),
            (
                "Portuguese".to_string(),
                vec![
                    ("Saint-Gilles".to_string(), 1.0),
                    ("Ixelles".to_string(), 0.6),
                ],
            ),
            (
                "Spanish".to_string(),
                vec![
                    ("Saint-Gilles".to_string(), 0.8),
                    ("Forest".to_string(), 0.6),
                ],
            ),
            (
                "Brazilian".to_string(),
                vec![("Saint-Gilles".to_string(), 0.7)],
            ),
            (
                "Ethiopian".to_string(),
                vec![
                    ("Ixelles".to_string(), 0.6),
                    ("Saint-Gilles".to_string(), 0.6),
                ],
            ),
            (
                "Vietnamese".to_string(),
                vec![
                    ("Ixelles".to_string(), 0.6),
                    ("Bruxelles".to_string(), 0.5),
                ],
            ),
            (
                "Chinese".to_string(),
                vec![("Bruxelles".to_string(), 0.7)],
            ),
            (
                "Polish".to_string(),
                vec![("Saint-Gilles".to_string(), 0.6)],
            ),
        ],

        // Where traditional Belgian cooking is anchored
        local_authenticity: vec![(
            "Belgian".to_string(),
            vec![
                ("Bruxelles".to_string(), 0.6),
                ("Etterbeek".to_string(), 0.7),
                ("Ixelles".to_string(), 0.5),
                ("Saint-Gilles".to_string(), 0.6),
                ("Anderlecht".to_string(), 0.7),
                ("Jette".to_string(), 0.7),
                ("Uccle".to_string(), 0.6),
                ("Schaerbeek".to_string(), 0.6),
                ("Auderghem".to_string(), 0.6),
                ("Watermael-Boitsfort".to_string(), 0.7),
                ("Woluwe-Saint-Lambert".to_string(), 0.6),
                ("Woluwe-Saint-Pierre".to_string(), 0.6),
            ],
        )],

        diaspora_cuisines: [
            "Congolese",
            "African",
            "Moroccan",
            "Turkish",
            "Lebanese",
            "Syrian",
            "Ethiopian",
            "Middle Eastern",
            "Portuguese",
            "Vietnamese",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),

        local_cuisines: ["Belgian", "Flemish", "Walloon"]
            .iter()
            .map(|c| c.to_string())
            .collect(),

        // Cuisines hard to find in Brussels; rarity is not quality, so the
        // scoring weight on this table stays minimal
        rare_cuisines: vec![
            ("Georgian".to_string(), 1.0),
            ("Hawaiian".to_string(), 1.0),
            ("Peruvian".to_string(), 0.9),
            ("Filipino".to_string(), 0.9),
            ("Malaysian".to_string(), 0.9),
            ("Sri Lankan".to_string(), 0.9),
            ("Tibetan".to_string(), 0.9),
            ("Burmese".to_string(), 0.9),
            ("Jamaican".to_string(), 0.9),
            ("Cuban".to_string(), 0.9),
            ("Scandinavian".to_string(), 0.8),
            ("Venezuelan".to_string(), 0.8),
            ("Argentinian".to_string(), 0.8),
            ("Nepalese".to_string(), 0.8),
            ("Caribbean".to_string(), 0.8),
            ("Taiwanese".to_string(), 0.8),
            ("Korean".to_string(), 0.7),
            ("Ethiopian".to_string(), 0.7),
            ("Indonesian".to_string(), 0.7),
            ("Szechuan".to_string(), 0.7),
            ("Cantonese".to_string(), 0.7),
        ],

        // Regional cuisines earn specificity over generic umbrella labels
        cuisine_specificity: vec![
            ("Sichuan".to_string(), 1.0),
            ("Szechuan".to_string(), 1.0),
            ("Cantonese".to_string(), 0.9),
            ("Hunan".to_string(), 1.0),
            ("Taiwanese".to_string(), 0.9),
            ("Shanghainese".to_string(), 1.0),
            ("Dim Sum".to_string(), 0.8),
            ("Hakka".to_string(), 1.0),
            ("Ramen".to_string(), 0.8),
            ("Izakaya".to_string(), 0.9),
            ("Kaiseki".to_string(), 1.0),
            ("Omakase".to_string(), 1.0),
            ("Yakitori".to_string(), 0.9),
            ("Korean BBQ".to_string(), 0.8),
            ("South Indian".to_string(), 0.9),
            ("Punjabi".to_string(), 0.9),
            ("Gujarati".to_string(), 1.0),
            ("Bengali".to_string(), 1.0),
            ("Kerala".to_string(), 1.0),
            ("Neapolitan".to_string(), 0.9),
            ("Sicilian".to_string(), 1.0),
            ("Tuscan".to_string(), 0.9),
            ("Roman".to_string(), 0.9),
            ("Venetian".to_string(), 1.0),
            ("Sardinian".to_string(), 1.0),
            ("Basque".to_string(), 1.0),
            ("Catalan".to_string(), 0.9),
            ("Galician".to_string(), 1.0),
            ("Lyonnaise".to_string(), 0.9),
            ("Provençal".to_string(), 0.9),
            ("Alsatian".to_string(), 0.9),
            ("Breton".to_string(), 0.9),
            ("Savoyard".to_string(), 0.9),
            ("Oaxacan".to_string(), 1.0),
            ("Levantine".to_string(), 0.8),
            ("Palestinian".to_string(), 1.0),
            ("Yemeni".to_string(), 1.0),
            ("Kurdish".to_string(), 1.0),
            ("Ethiopian".to_string(), 0.8),
            ("Eritrean".to_string(), 0.9),
            ("Senegalese".to_string(), 1.0),
            ("Ivorian".to_string(), 1.0),
            ("Cameroonian".to_string(), 1.0),
            ("Ghanaian".to_string(), 1.0),
            ("Nigerian".to_string(), 0.9),
            ("Congolese".to_string(), 0.8),
        ],

        // Chains: international plus the Belgian usual suspects
        chain_patterns: vec![
            r"mcdonald".to_string(),
            r"burger king".to_string(),
            r"\bquick\b".to_string(),
            r"kfc".to_string(),
            r"subway".to_string(),
            r"domino".to_string(),
            r"pizza hut".to_string(),
            r"starbucks".to_string(),
            r"panos".to_string(),
            r"exki".to_string(),
            r"le pain quotidien".to_string(),
            r"\bpaul\b".to_string(),
            r"class'croute".to_string(),
            r"pizza express".to_string(),
            r"vapiano".to_string(),
            r"wagamama".to_string(),
            r"nando".to_string(),
            r"five guys".to_string(),
            r"pitaya".to_string(),
            r"sushi shop".to_string(),
            r"planet sushi".to_string(),
            r"bavet".to_string(),
            r"balls & glory".to_string(),
            r"ellis gourmet".to_string(),
            r"fred & ginger".to_string(),
            r"otomat".to_string(),
            r"manhattn".to_string(),
            r"il fiore".to_string(),
            r"delitraiteur".to_string(),
            r"o'tacos".to_string(),
        ],

        // Supermarkets, hotels and the famous chocolatiers: not restaurants
        non_restaurant_patterns: vec![
            r"carrefour".to_string(),
            r"delhaize".to_string(),
            r"colruyt".to_string(),
            r"\baldi\b".to_string(),
            r"\blidl\b".to_string(),
            r"\bproxy\b".to_string(),
            r"\bhotel\b".to_string(),
            r"\bhôtel\b".to_string(),
            r"thermen".to_string(),
            r"wellness".to_string(),
            r"\bcorné\b".to_string(),
            r"\bneuhaus\b".to_string(),
            r"\bgodiva\b".to_string(),
            r"\bleonidas\b".to_string(),
            r"\bpierre marcolini\b".to_string(),
            r"\bmarcolini\b".to_string(),
            r"\bgaller\b".to_string(),
            r"\bwittamer\b".to_string(),
            r"\bchocolatier\b".to_string(),
            r"\bchocolate shop\b".to_string(),
            r"\bpralines\b".to_string(),
        ],

        hipster_keywords: vec![
            "fusion".to_string(),
            "concept".to_string(),
            "atelier".to_string(),
            "lab".to_string(),
            "loft".to_string(),
            "urban".to_string(),
        ],

        non_restaurant_locations: vec![
            "wolf".to_string(),
            "food market".to_string(),
            "food hall".to_string(),
            "casino".to_string(),
            "viage".to_string(),
            "hotel restaurant".to_string(),
            "station".to_string(),
            "gare".to_string(),
            "sncb".to_string(),
            "nmbs".to_string(),
        ],

        // Michelin recognition (2024/2025). "La Paix" is an exact directive
        // so that it never claims longer unrelated names.
        michelin_stars: vec![
            (GuideEntry::word("bozar restaurant"), 2),
            (GuideEntry::word("comme chez soi"), 2),
            (GuideEntry::word("villa in the sky"), 2),
            (GuideEntry::word("chalet de la forêt"), 2),
            (GuideEntry::exact("la paix"), 1),
            (GuideEntry::word("barge"), 1),
            (GuideEntry::word("da mimmo"), 1),
            (GuideEntry::word("eliane"), 1),
            (GuideEntry::word("humus x hortense"), 1),
            (GuideEntry::word("kamo"), 1),
            (GuideEntry::word("la canne en ville"), 1),
            (GuideEntry::word("villa lorraine"), 1),
            (GuideEntry::word("le pigeon noir"), 1),
            (GuideEntry::word("menssa"), 1),
            (GuideEntry::word("senzanome"), 1),
        ],

        // Bib Gourmand: good value recognition
        value_guide: vec![
            GuideEntry::word("crab club"),
            GuideEntry::word("humphrey"),
            GuideEntry::word("kolya"),
            GuideEntry::word("les brigittines"),
            GuideEntry::word("maison du luxembourg"),
            GuideEntry::word("notos"),
            GuideEntry::word("orphyse chaussette"),
            GuideEntry::word("pablo's"),
            GuideEntry::word("tero"),
            GuideEntry::word("wine in the city"),
        ],

        regional_guides: vec![(
            "gault_millau".to_string(),
            vec![
                GuideEntry::word("le chalet de la forêt"),
                GuideEntry::word("bon-bon"),
                GuideEntry::word("la villa lorraine"),
                GuideEntry::word("comme chez soi"),
                GuideEntry::word("sea grill"),
                GuideEntry::word("san sablon"),
            ],
        )],

        // Institutions every Bruxellois knows
        local_institutions: vec![
            ("maison antoine".to_string(), 1.0),
            ("fritland".to_string(), 0.9),
            ("frit flagey".to_string(), 0.9),
            ("friture rené".to_string(), 1.0),
            ("la mort subite".to_string(), 0.7),
            ("au vieux saint martin".to_string(), 0.8),
            ("le pré salé".to_string(), 0.8),
            ("viva m'boma".to_string(), 0.9),
            ("comme chez soi".to_string(), 1.0),
        ],

        classic_fry_shops: vec![
            "maison antoine".to_string(),
            "fritland".to_string(),
            "frit flagey".to_string(),
            "friture rené".to_string(),
            "friture de la barrière".to_string(),
        ],

        family_name_patterns: vec![
            r"^chez\s".to_string(),
            r"\bla maison de\b".to_string(),
            r"^au\s+(bon|vieux|petit)\b".to_string(),
            r"^aux\s+(bons|vieux|petits)\b".to_string(),
            r"^bij\s".to_string(),
            r"^'t\s".to_string(),
            r"\b(mama|papa|granny|nonna|grandma)\b".to_string(),
        ],

        community_source: Some("reddit:brussels".to_string()),
        timezone: "Europe/Brussels".to_string(),
    }
}
