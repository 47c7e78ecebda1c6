use np_core::{Category, NormalizedArticle};

pub const PLACEHOLDERS_PER_CATEGORY: usize = 10;

struct Seed {
    id: &'static str,
    title: &'static str,
    source: &'static str,
    description: &'static str,
}

const HYDERABAD: &[Seed] = &[
    Seed {
        id: "h1",
        title: "Hyderabad Metro Expansion Plans Approved",
        source: "The Hindu",
        description: "The state government has given the green light for the second phase of the Hyderabad Metro Rail project, connecting the old city to the airport.",
    },
    Seed {
        id: "h2",
        title: "Traffic Restrictions in Jubilee Hills Today",
        source: "Siasat",
        description: "Hyderabad Traffic Police have issued an advisory regarding traffic diversions in Jubilee Hills due to ongoing flyover construction work.",
    },
    Seed {
        id: "h3",
        title: "Historic Charminar Restoration Begins",
        source: "Deccan Chronicle",
        description: "The Archaeological Survey of India (ASI) has commenced a major restoration project to preserve the intricate stucco work of the Charminar.",
    },
    Seed {
        id: "h4",
        title: "New IT Park Announced for Kompally",
        source: "Telangana Today",
        description: "To decentralize the IT sector, the government has announced a new IT park in Kompally, expected to generate 50,000 jobs.",
    },
];

const TELANGANA: &[Seed] = &[
    Seed {
        id: "t1",
        title: "Telangana Tech Summit 2025 Announced",
        source: "Telangana Today",
        description: "Hyderabad is set to host the largest AI and Robotics summit in South Asia next month, attracting global investors.",
    },
    Seed {
        id: "t2",
        title: "Farmers Receive Rythu Bandhu Aid",
        source: "The Hindu",
        description: "The state government has released the latest installment of Rythu Bandhu investment support to over 60 lakh farmers across the state.",
    },
];

const INDIA: &[Seed] = &[
    Seed {
        id: "i1",
        title: "India Launches New Solar Mission",
        source: "NDTV",
        description: "ISRO successfully launches its advanced solar observatory, aiming to study solar flares and their impact on Earths atmosphere.",
    },
    Seed {
        id: "i2",
        title: "Digital Rupee Pilot Expands",
        source: "Times of India",
        description: "RBI announces the expansion of the Digital Rupee pilot project to five more cities, aiming to modernize payment systems.",
    },
];

const INTERNATIONAL: &[Seed] = &[Seed {
    id: "w1",
    title: "Global Climate Accord Reached",
    source: "BBC",
    description: "World leaders have signed a historic agreement to reduce carbon emissions by 50% within the next decade.",
}];

const SPORTS: &[Seed] = &[Seed {
    id: "s1",
    title: "India Wins Thriller Against Australia",
    source: "ESPN Cricinfo",
    description: "In a last-over finish, Team India secured a victory by 2 wickets in the opening T20 match of the series.",
}];

const STUDIO: &[Seed] = &[Seed {
    id: "az1",
    title: "Azad Studio: New Documentary Release",
    source: "Azad Studio Updates",
    description: "Our latest documentary \"Voices of the Silent\" premieres this Friday. Join us for the live screening event.",
}];

/// Seeds plus the prefix and headline used to pad each category to
/// [`PLACEHOLDERS_PER_CATEGORY`].
fn seeds(category: Category) -> Option<(&'static [Seed], &'static str, &'static str)> {
    match category {
        Category::Hyderabad => Some((HYDERABAD, "h_extra_", "Local Hyderabad News")),
        Category::Telangana => Some((TELANGANA, "t_extra_", "State Development Update")),
        Category::India => Some((INDIA, "i_extra_", "National News Brief")),
        Category::International => Some((INTERNATIONAL, "w_extra_", "Global Headlines")),
        Category::Sports => Some((SPORTS, "s_extra_", "Sports Update")),
        Category::Studio => Some((STUDIO, "az_extra_", "Studio Announcement")),
        Category::Founders | Category::Gallery => None,
    }
}

fn placeholder_image(id: &str) -> String {
    format!("https://picsum.photos/seed/{}/800/600", id)
}

/// Static articles a UI shows when a category has nothing live or cached.
/// Founders and Gallery have none.
pub fn placeholder_articles(category: Category) -> Vec<NormalizedArticle> {
    let Some((seeds, extra_prefix, extra_title)) = seeds(category) else {
        return Vec::new();
    };

    let mut articles: Vec<NormalizedArticle> = seeds
        .iter()
        .map(|seed| NormalizedArticle {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            source: seed.source.to_string(),
            published_at: None,
            description: seed.description.to_string(),
            image_url: Some(placeholder_image(seed.id)),
            category,
            url: "#".to_string(),
        })
        .collect();

    let extras = PLACEHOLDERS_PER_CATEGORY.saturating_sub(articles.len());
    articles.extend((1..=extras).map(|i| {
        let id = format!("{}{}", extra_prefix, i);
        NormalizedArticle {
            title: format!("{} - Update {}", extra_title, i),
            source: "News Archive".to_string(),
            published_at: None,
            description: format!(
                "This is a placeholder description for article {} in the {} category. It ensures the grid is never empty even if the RSS feed is unreachable.",
                i, category
            ),
            image_url: Some(placeholder_image(&id)),
            category,
            url: "#".to_string(),
            id,
        }
    }));
    articles
}
