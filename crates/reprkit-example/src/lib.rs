//! People living at addresses in cities.
//!
//! Each [`City`] owns an occupancy [`Registry`]. A [`Person`] settled in a city
//! claims the `"{street}-{number}"` key of their address there, and moving
//! them releases the old key and claims the new one under both registries'
//! locks.

use std::str::FromStr;
use std::sync::Arc;

use reprkit::{Introspect, OccupancyKey, Registry, RegistryConfig, RegistryError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CityError {
    #[error("unknown city `{name}`")]
    UnknownCity { name: String },
}

#[derive(Debug, Error)]
pub enum PersonError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Introspect)]
#[introspect(format = "{1}", display)]
pub enum CityName {
    Paris,
    #[default]
    London,
    #[introspect(format = "New York")]
    NewYork,
}

impl FromStr for CityName {
    type Err = CityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paris" => Ok(CityName::Paris),
            "london" => Ok(CityName::London),
            "new york" => Ok(CityName::NewYork),
            _ => Err(CityError::UnknownCity {
                name: s.to_string(),
            }),
        }
    }
}

/// A city and the addresses occupied in it.
///
/// Clones share the same registry.
#[derive(Debug, Clone)]
pub struct City {
    name: CityName,
    registry: Arc<Registry>,
}

impl City {
    pub fn new(name: &str) -> Result<Self, CityError> {
        name.parse().map(Self::from_name)
    }

    pub fn from_name(name: CityName) -> Self {
        Self::with_config(name, RegistryConfig::default())
    }

    pub fn with_config(name: CityName, config: RegistryConfig) -> Self {
        Self {
            name,
            registry: Arc::new(Registry::with_config(name.to_string(), config)),
        }
    }

    pub fn name(&self) -> CityName {
        self.name
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn is_address_occupied(&self, key: &str) -> bool {
        self.registry.is_occupied(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Introspect)]
#[introspect(name = "Address", display)]
pub enum PostalAddress {
    House {
        country: String,
        city: String,
        street: String,
        street_number: u32,
    },
}

impl PostalAddress {
    pub fn house(
        country: impl Into<String>,
        city: impl Into<String>,
        street: impl Into<String>,
        street_number: u32,
    ) -> Self {
        PostalAddress::House {
            country: country.into(),
            city: city.into(),
            street: street.into(),
            street_number,
        }
    }

    pub fn occupancy_key(&self) -> OccupancyKey {
        match self {
            PostalAddress::House {
                street,
                street_number,
                ..
            } => OccupancyKey::new(street, street_number),
        }
    }

    /// `"{country}, {city}, {street}-{number}"`
    pub fn full_address(&self) -> String {
        match self {
            PostalAddress::House {
                country, city, ..
            } => format!("{country}, {city}, {}", self.occupancy_key()),
        }
    }
}

#[derive(Debug, Clone, Introspect)]
#[introspect(display)]
pub struct Person {
    pub name: String,
    age: u8,
    address: PostalAddress,
    #[introspect(skip)]
    residence: Option<City>,
}

impl Person {
    /// A person at `address` without claiming it in any city.
    pub fn new(name: impl Into<String>, age: u8, address: PostalAddress) -> Self {
        Self {
            name: name.into(),
            age,
            address,
            residence: None,
        }
    }

    /// A person living in `city`; claims the address there.
    #[tracing::instrument(
        name = "example.person.settle",
        level = "debug",
        skip_all,
        fields(city = %city.name())
    )]
    pub fn settle(
        name: impl Into<String>,
        age: u8,
        country: impl Into<String>,
        city: &City,
        street: impl Into<String>,
        street_number: u32,
    ) -> Result<Self, PersonError> {
        let address = PostalAddress::house(country, city.name().to_string(), street, street_number);
        city.registry().claim(address.occupancy_key())?;

        let person = Self {
            name: name.into(),
            age,
            address,
            residence: Some(city.clone()),
        };
        info!(name = %person.name, "person settled");
        Ok(person)
    }

    /// Move to a new address in `city`.
    ///
    /// Releases the old address in the current residence and claims the new
    /// one while both registries are locked. On a partial move the old address
    /// stays released and the stored address is left unchanged.
    #[tracing::instrument(
        name = "example.person.change_address",
        level = "debug",
        skip_all,
        fields(name = %self.name, to = %city.name())
    )]
    pub fn change_address(
        &mut self,
        country: impl Into<String>,
        city: &City,
        street: impl Into<String>,
        street_number: u32,
    ) -> Result<(), PersonError> {
        let address = PostalAddress::house(country, city.name().to_string(), street, street_number);
        let new_key = address.occupancy_key();

        match &self.residence {
            Some(current) => {
                let old_key = self.address.occupancy_key();
                Registry::move_key(current.registry(), old_key.as_str(), city.registry(), new_key)?;
            }
            None => city.registry().claim(new_key)?,
        }

        debug!(from = %self.address.full_address(), to = %address.full_address(), "address changed");
        self.address = address;
        self.residence = Some(city.clone());
        Ok(())
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn age_text(&self) -> String {
        self.age.to_string()
    }

    pub fn address(&self) -> &PostalAddress {
        &self.address
    }

    pub fn residence(&self) -> Option<&City> {
        self.residence.as_ref()
    }

    pub fn full_address(&self) -> String {
        self.address.full_address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("paris", CityName::Paris)]
    #[case("London", CityName::London)]
    #[case("NEW YORK", CityName::NewYork)]
    fn city_names_parse_case_insensitively(#[case] input: &str, #[case] expected: CityName) {
        assert_eq!(input.parse::<CityName>(), Ok(expected));
    }

    #[test]
    fn unknown_city_is_rejected() {
        assert_eq!(
            City::new("City here").unwrap_err(),
            CityError::UnknownCity {
                name: "City here".to_string()
            }
        );
        assert_eq!(CityName::default(), CityName::London);
    }

    #[rstest]
    #[case(CityName::Paris, "Paris")]
    #[case(CityName::London, "London")]
    #[case(CityName::NewYork, "New York")]
    fn city_names_display_their_spelled_out_name(#[case] name: CityName, #[case] expected: &str) {
        assert_eq!(name.to_string(), expected);
        assert_eq!(name.to_string().parse::<CityName>(), Ok(name));
    }

    #[test]
    fn address_keys_and_full_address() {
        let address = PostalAddress::house("UK", "London", "Baker Street", 221);
        assert_eq!(address.occupancy_key().as_str(), "Baker Street-221");
        assert_eq!(address.full_address(), "UK, London, Baker Street-221");
    }

    #[test]
    fn city_clones_share_occupancy() {
        let london = City::new("london").unwrap();
        let alias = london.clone();
        london.registry().claim("Baker Street-221").unwrap();
        assert!(alias.is_address_occupied("Baker Street-221"));
    }
}
