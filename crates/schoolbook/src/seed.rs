//! Demonstration records shown when nothing has been registered yet.
//!
//! Seed records are display-only; the gallery never writes them back to
//! the store.

use crate::school::SchoolRecord;

/// Supplies records to show in place of an empty store.
pub trait SeedProvider {
    /// Records to display when the store is empty, in display order.
    fn seed_records(&self) -> Vec<SchoolRecord>;
}

/// The three built-in demonstration schools.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSeed;

/// Provides nothing, so an empty store shows the empty state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeed;

/// id, name, address, city, state, contact, email, image
type DemoRow = (
    i64,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const DEMO_ROWS: [DemoRow; 3] = [
    (
        1,
        "Greenwood High School",
        "123 Education Street",
        "Mumbai",
        "Maharashtra",
        "9876543210",
        "info@greenwood.edu",
        "/modern-school-building.png",
    ),
    (
        2,
        "St. Mary's Convent School",
        "456 Learning Avenue",
        "Delhi",
        "Delhi",
        "9876543211",
        "contact@stmarys.edu",
        "/traditional-school-building.jpg",
    ),
    (
        3,
        "Sunrise International School",
        "789 Knowledge Road",
        "Bangalore",
        "Karnataka",
        "9876543212",
        "admin@sunrise.edu",
        "/international-school-campus.jpg",
    ),
];

impl SeedProvider for DemoSeed {
    fn seed_records(&self) -> Vec<SchoolRecord> {
        DEMO_ROWS
            .iter()
            .map(
                |&(id, name, address, city, state, contact, email_id, image)| SchoolRecord {
                    id,
                    name: name.to_string(),
                    address: address.to_string(),
                    city: city.to_string(),
                    state: state.to_string(),
                    contact: contact.to_string(),
                    email_id: email_id.to_string(),
                    image: image.to_string(),
                },
            )
            .collect()
    }
}

impl SeedProvider for NoSeed {
    fn seed_records(&self) -> Vec<SchoolRecord> {
        Vec::new()
    }
}

impl SeedProvider for Vec<SchoolRecord> {
    fn seed_records(&self) -> Vec<SchoolRecord> {
        self.clone()
    }
}
