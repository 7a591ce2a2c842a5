//! Read one card in ISO mode and print its tracks
//!
//! `MSR_PORT=/dev/ttyUSB0 RUST_LOG=msrkit=debug cargo run --example read_card`

use msrkit::Device;
use tracing_subscriber::EnvFilter;

fn main() -> msrkit::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = std::env::var("MSR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut device = Device::open(port)?;
    device.reset()?;
    device.test_comms()?;
    println!("✓ Device is responding");

    let coercivity = device.coercivity()?;
    let zeros = device.leading_zeros()?;
    println!("✓ Writes {}, leading zeros {}", coercivity, zeros);

    println!("Swipe a card...");
    let card = device.read_iso()?;

    if card.is_blank() {
        println!("Card is blank");
    }
    for (track, data) in card.iter() {
        println!("{}: {}", track, data);
    }

    device.close()?;
    Ok(())
}
