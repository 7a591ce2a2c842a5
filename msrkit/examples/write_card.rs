//! Encode track text on the host and write it in raw mode
//!
//! `MSR_PORT=/dev/ttyUSB0 cargo run --example write_card -- ";12345=6789?"`

use msrkit::{
    Coercivity, Device, IsoCard, TrackNumber, TrackSet,
    card::{self, ISO_WIDTHS},
};
use tracing_subscriber::EnvFilter;

fn main() -> msrkit::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = std::env::var("MSR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let track2 = std::env::args()
        .nth(1)
        .unwrap_or_else(|| ";0123456789=0123?".to_string());

    let text = IsoCard::new().with_track(TrackNumber::Two, track2.as_str());
    let raw = card::encode_card(&text, ISO_WIDTHS)?;

    let mut device = Device::open(port)?;
    device.reset()?;
    device.set_coercivity(Coercivity::High)?;
    device.set_bits_per_char(7, 5, 5)?;
    device.set_density(2, 75)?;

    println!("Swipe a card to erase track 2...");
    device.erase(TrackSet::TRACK2)?;

    println!("Swipe the card again to write...");
    device.write_raw(&raw)?;
    println!("✓ Written");

    println!("Swipe the card again to verify...");
    let check = device.read_raw_decoded(ISO_WIDTHS)?;
    match check.track(TrackNumber::Two) {
        Some(read) if read.as_bytes() == track2.as_bytes() => println!("✓ Verified: {}", read),
        Some(read) => println!("✗ Mismatch: {}", read),
        None => println!("✗ Track 2 missing"),
    }

    device.close()?;
    Ok(())
}
