// src/case.rs
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suspect {
    pub name: String,
    pub secret: String, // Guilt and the fact to hide, fed to the model only.
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub victim: String,
    pub crime: String,
    pub location: String,
    pub time: String,
    pub suspects: Vec<Suspect>,
    pub image_ref: String,
}

impl Case {
    pub fn suspect(&self, name: &str) -> Option<&Suspect> {
        self.suspects
            .iter()
            .find(|suspect| suspect.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn suspect_names(&self) -> Vec<&str> {
        self.suspects.iter().map(|s| s.name.as_str()).collect()
    }
}

struct CaseRecord {
    victim: &'static str,
    crime: &'static str,
    location: &'static str,
    time: &'static str,
    suspects: &'static [(&'static str, &'static str)],
    image_ref: &'static str,
}

impl CaseRecord {
    fn to_case(&self) -> Case {
        Case {
            victim: self.victim.to_string(),
            crime: self.crime.to_string(),
            location: self.location.to_string(),
            time: self.time.to_string(),
            suspects: self
                .suspects
                .iter()
                .map(|(name, secret)| Suspect {
                    name: name.to_string(),
                    secret: secret.to_string(),
                })
                .collect(),
            image_ref: self.image_ref.to_string(),
        }
    }
}

const CATALOG: &[CaseRecord] = &[
    CaseRecord {
        victim: "Mr. Jonathan Reed",
        crime: "Diamond theft",
        location: "City Museum",
        time: "midnight",
        suspects: &[
            ("Night Guard", "Disabled cameras and stole the diamond."),
            ("Curator", "Had access to keys but innocent."),
            ("Janitor", "Was cleaning late, innocent."),
        ],
        image_ref: "https://images.unsplash.com/photo-1572373446215-933b3aef5e0b?auto=format&fit=crop&w=800&q=80",
    },
    CaseRecord {
        victim: "Ms. Clara Stone",
        crime: "Poisoning",
        location: "Grand Hotel",
        time: "during dinner",
        suspects: &[
            ("Business Partner", "Poisoned the drink to gain control."),
            ("Chef", "Cooked dinner, innocent."),
            ("Guest", "Attended dinner, innocent."),
        ],
        image_ref: "https://images.unsplash.com/photo-1605296867304-46d5465a13f1?auto=format&fit=crop&w=800&q=80",
    },
];

pub fn catalog() -> Vec<Case> {
    CATALOG.iter().map(CaseRecord::to_case).collect()
}

pub fn pick_random_case() -> Case {
    pick_random_case_with(&mut rand::rng())
}

pub fn pick_random_case_with(rng: &mut impl Rng) -> Case {
    CATALOG
        .choose(rng)
        .map(CaseRecord::to_case)
        .unwrap_or_else(|| CATALOG[0].to_case())
}

pub fn pick_culprit(case: &Case) -> Suspect {
    pick_culprit_with(case, &mut rand::rng())
}

// Every catalog case has suspects, so the fallback is only reachable for hand-built cases.
pub fn pick_culprit_with(case: &Case, rng: &mut impl Rng) -> Suspect {
    case.suspects.choose(rng).cloned().unwrap_or_else(|| Suspect {
        name: "Unknown".to_string(),
        secret: "Nobody knows.".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn every_catalog_case_has_suspects() {
        for case in catalog() {
            assert!(!case.suspects.is_empty(), "{} has no suspects", case.crime);
            assert!(case.image_ref.starts_with("https://"));
        }
    }

    #[test]
    fn culprit_always_comes_from_the_roster() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let case = pick_random_case_with(&mut rng);
            let culprit = pick_culprit_with(&case, &mut rng);
            assert!(case.suspects.contains(&culprit));
        }
    }

    #[test]
    fn both_cases_are_drawn_eventually() {
        let mut rng = StdRng::seed_from_u64(42);
        let crimes: std::collections::HashSet<String> = (0..100)
            .map(|_| pick_random_case_with(&mut rng).crime)
            .collect();
        assert_eq!(crimes.len(), CATALOG.len());
    }

    #[test]
    fn suspect_lookup_ignores_case() {
        let case = catalog().remove(0);
        assert_eq!(case.suspect("night guard").map(|s| s.name.as_str()), Some("Night Guard"));
        assert!(case.suspect("Butler").is_none());
    }
}
