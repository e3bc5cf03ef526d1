//! Display text for generated entities.

use rand::seq::SliceRandom;
use rand::Rng;

use campusgraph_core::{EntityKind, PersonRole};

const UNIVERSITY_TEMPLATES: &[&str] = &[
    "State University of {}",
    "{} Technical University",
    "University of {}",
    "{} College",
    "{} Institute of Technology",
];

const STATES: &[&str] = &[
    "New York",
    "California",
    "Texas",
    "Florida",
    "Illinois",
    "Pennsylvania",
    "Ohio",
    "Michigan",
    "Georgia",
    "North Carolina",
];

const CITIES: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
    "Austin",
    "Jacksonville",
    "Fort Worth",
    "Columbus",
    "San Francisco",
    "Charlotte",
    "Indianapolis",
    "Seattle",
    "Denver",
    "Boston",
];

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Michael", "Emily", "David", "Sarah", "James", "Emma", "William", "Olivia",
];

const LAST_NAMES: &[&str] = &[
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
];

const SUBJECTS: &[&str] = &[
    "Computer Science",
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Literature",
    "Philosophy",
    "Psychology",
    "Economics",
];

const LEVELS: &[&str] = &[
    "Introduction to",
    "Advanced",
    "Intermediate",
    "Fundamentals of",
    "Topics in",
];

const CAMPUS_TYPES: &[&str] = &[
    "Main Campus",
    "North Campus",
    "South Campus",
    "Downtown Campus",
    "Medical Campus",
    "Research Campus",
    "Technology Campus",
    "Arts Campus",
];

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Title and body for the `index`-th entity of `kind` in a batch.
///
/// Cities and campuses cycle through their lists by index; the other kinds
/// draw from `rng`.
pub fn compose<R: Rng>(kind: EntityKind, index: usize, rng: &mut R) -> (String, String) {
    match kind {
        EntityKind::University => {
            let template = pick(rng, UNIVERSITY_TEMPLATES);
            let name = template.replace("{}", pick(rng, STATES));
            let body = format!("Welcome to {name}, a leading institution of higher education.");
            (name, body)
        }
        EntityKind::City => {
            let name = CITIES[index % CITIES.len()].to_string();
            let body = format!(
                "Welcome to {name}, a vibrant city with excellent educational opportunities."
            );
            (name, body)
        }
        EntityKind::Person => {
            let name = format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES));
            let body = format!("Biography of {name}.");
            (name, body)
        }
        EntityKind::Course => {
            let name = format!("{} {}", pick(rng, LEVELS), pick(rng, SUBJECTS));
            let body = format!("Course description for {name}.");
            (name, body)
        }
        EntityKind::Campus => {
            let name = format!("{} {}", CAMPUS_TYPES[index % CAMPUS_TYPES.len()], index + 1);
            let body = format!("Information about {name}.");
            (name, body)
        }
    }
}

/// Uniform draw from the five person roles.
pub fn random_role<R: Rng>(rng: &mut R) -> PersonRole {
    PersonRole::ALL
        .choose(rng)
        .copied()
        .unwrap_or(PersonRole::Student)
}
