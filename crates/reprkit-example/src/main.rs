use anyhow::{Context, Result};
use reprkit::{IntrospectExt, init_tracing};
use reprkit_example::{City, Person, PostalAddress};
use tracing::info;

fn main() -> Result<()> {
    init_tracing().context("failed to install tracing")?;

    let person = Person::new(
        "Name here",
        0,
        PostalAddress::house("Country here", "City here", "Street here", 4294967295),
    );
    println!("{person}");
    println!("{}", person.to_mapping()?);
    println!("{:?}", person.visible_attribute_names()?);
    println!("{:?}", person.address().visible_attribute_names()?);
    if let Err(err) = person.get_attribute("not_name") {
        println!("{err}");
    }

    let london = City::new("London")?;
    let new_york = City::new("new york")?;
    let mut holmes = Person::settle("Sherlock Holmes", 60, "UK", &london, "Baker Street", 221)?;
    info!(
        occupied = london.is_address_occupied("Baker Street-221"),
        "settled in London"
    );

    holmes.change_address("USA", &new_york, "5th Avenue", 100)?;
    println!("{holmes}");
    println!(
        "London has Baker Street-221: {}, New York has 5th Avenue-100: {}",
        london.is_address_occupied("Baker Street-221"),
        new_york.is_address_occupied("5th Avenue-100"),
    );

    Ok(())
}
