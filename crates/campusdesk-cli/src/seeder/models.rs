//! Seed records and the knobs that size a seeding run.

use campusdesk_auth::Role;

/// Seeded users get phones under this prefix; `clear-seed` deletes by it.
pub const SEED_PHONE_PREFIX: &str = "+998990";

/// Seeded courses carry this description.
pub const SEED_MARKER: &str = "seeded";

pub struct PersonSeed {
    pub phone: String,
    pub full_name: String,
    pub role: Role,
}

pub struct CourseSeed {
    pub title: String,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub courses: usize,
    pub groups_per_course: usize,
    pub students_per_group: usize,
    pub teachers: usize,
    pub staff: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            courses: 4,
            groups_per_course: 2,
            students_per_group: 12,
            teachers: 6,
            staff: 2,
        }
    }
}

impl SeedConfig {
    pub fn new(courses: usize) -> Self {
        Self {
            courses,
            ..Default::default()
        }
    }

    pub fn total_groups(&self) -> usize {
        self.courses * self.groups_per_course
    }

    pub fn total_students(&self) -> usize {
        self.total_groups() * self.students_per_group
    }

    pub fn total_users(&self) -> usize {
        self.total_students() + self.teachers + self.staff
    }
}

/// `+998990` followed by a zero-padded six digit sequence number.
pub fn seed_phone(seq: usize) -> String {
    format!("{SEED_PHONE_PREFIX}{:06}", seq % 1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusdesk_models::value_types::Phone;

    #[test]
    fn test_seed_phones_are_valid_and_distinct() {
        let a = seed_phone(1);
        let b = seed_phone(2);
        assert_eq!(a, "+998990000001");
        assert_ne!(a, b);
        assert!(a.parse::<Phone>().is_ok());
    }

    #[test]
    fn test_totals() {
        let config = SeedConfig {
            courses: 2,
            groups_per_course: 3,
            students_per_group: 10,
            teachers: 4,
            staff: 1,
        };
        assert_eq!(config.total_groups(), 6);
        assert_eq!(config.total_students(), 60);
        assert_eq!(config.total_users(), 65);
    }
}
