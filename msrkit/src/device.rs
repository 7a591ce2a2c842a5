//! High-level device interface

use tracing::{debug, info, trace, warn};

use msrkit_core::{
    Ack, BitsPerChar, CommandFrame, Opcode, ParseMode, Progress, TrackParser,
    constants::{COERCIVITY_HIGH, COERCIVITY_LOW},
};
use msrkit_transport::{SerialTransport, Transport};
use msrkit_types::{
    Bpi, Coercivity, IsoCard, IsoTrack, LeadingZeros, RawCard, RawTrack, TrackNumber, TrackSet,
    Tracks,
};

use crate::{
    card,
    config::DeviceConfig,
    error::{Error, Result},
};

/// Density command settings, indexed by `(track - 1) * 2 + (bpi == 210)`
const DENSITY_SETTINGS: [u8; 6] = [0xA0, 0xA1, 0x4B, 0xD2, 0xC0, 0xC1];

/// MSRxxx magnetic stripe reader/writer
///
/// Every operation purges the transport, sends one command and waits for
/// the complete answer before returning. Card commands block until a card
/// is swiped or the transport's read timeout expires.
///
/// # Examples
///
/// ```no_run
/// use msrkit::Device;
///
/// fn main() -> msrkit::Result<()> {
///     let mut device = Device::open("/dev/ttyUSB0")?;
///
///     device.test_comms()?;
///     println!("Swipe a card...");
///     let card = device.read_iso()?;
///     for (track, data) in card.iter() {
///         println!("{}: {}", track, data);
///     }
///
///     device.close()?;
///     Ok(())
/// }
/// ```
pub struct Device<T: Transport = SerialTransport> {
    transport: T,
    config: DeviceConfig,
}

impl Device<SerialTransport> {
    /// Open a serial port at 9600 8N1 and wrap it
    pub fn open(port_name: impl Into<String>) -> Result<Self> {
        Self::open_with(SerialTransport::new(port_name))
    }

    /// Open a pre-configured serial transport and wrap it
    pub fn open_with(mut transport: SerialTransport) -> Result<Self> {
        transport.open()?;
        let device = Self::new(transport);
        info!("Opened device on {}", device.transport.port_name());
        Ok(device)
    }
}

impl<T: Transport> Device<T> {
    /// Wrap an already opened transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: DeviceConfig::default(),
        }
    }

    /// Replace the protocol settings
    pub fn with_config(mut self, config: DeviceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Release the port
    pub fn close(&mut self) -> Result<()> {
        if self.transport.is_open() {
            info!("Closing device on {}", self.transport.port_name());
        }
        self.transport.close()?;
        Ok(())
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Reset the device to its power-on state
    ///
    /// The device does not answer this command.
    pub fn reset(&mut self) -> Result<()> {
        debug!("Resetting device...");
        self.send_command(&CommandFrame::new(Opcode::Reset))
    }

    /// Check that the device is alive
    pub fn test_comms(&mut self) -> Result<()> {
        debug!("Testing communication...");
        self.command(
            &CommandFrame::new(Opcode::TestComms),
            self.config.test_comms_status,
        )?;
        debug!("Communication OK");
        Ok(())
    }

    /// Erase tracks on the next swiped card
    pub fn erase(&mut self, tracks: TrackSet) -> Result<()> {
        if tracks.is_empty() {
            return Err(invalid_argument("erase needs at least one track"));
        }

        debug!("Erasing tracks {:?}, swipe a card", tracks);
        let frame = CommandFrame::new(Opcode::Erase).with_params(vec![tracks.bits()]);
        self.command(&frame, self.config.ack_status)
    }

    /// Select the write coercivity
    pub fn set_coercivity(&mut self, coercivity: Coercivity) -> Result<()> {
        debug!("Setting coercivity to {}", coercivity);
        let opcode = match coercivity {
            Coercivity::High => Opcode::SetHiCo,
            Coercivity::Low => Opcode::SetLoCo,
        };
        self.command(&CommandFrame::new(opcode), self.config.ack_status)
    }

    /// Query the write coercivity
    pub fn coercivity(&mut self) -> Result<Coercivity> {
        self.send_command(&CommandFrame::new(Opcode::GetCoercivity))?;
        self.read_escape()?;

        let coercivity = match self.transport.read_byte()? {
            COERCIVITY_HIGH => Coercivity::High,
            COERCIVITY_LOW => Coercivity::Low,
            other => {
                return Err(msrkit_core::Error::UnexpectedResponse {
                    expected: "coercivity 'H' or 'L'",
                    received: other,
                }
                .into());
            }
        };

        debug!("Coercivity: {}", coercivity);
        Ok(coercivity)
    }

    /// Set the number of zero bits written ahead of track data
    pub fn set_leading_zeros(&mut self, zeros: LeadingZeros) -> Result<()> {
        debug!("Setting leading zeros ({})", zeros);
        let frame = CommandFrame::new(Opcode::SetLeadingZeros)
            .with_params(vec![zeros.tracks13, zeros.track2]);
        self.command(&frame, self.config.ack_status)
    }

    /// Query the leading zero counts
    pub fn leading_zeros(&mut self) -> Result<LeadingZeros> {
        self.send_command(&CommandFrame::new(Opcode::GetLeadingZeros))?;
        self.read_escape()?;

        let mut counts = [0u8; 2];
        self.transport.read_exact(&mut counts)?;

        let zeros = LeadingZeros::new(counts[0], counts[1]);
        debug!("Leading zeros: {}", zeros);
        Ok(zeros)
    }

    /// Set the recording density of one track
    ///
    /// `track` must be 1, 2 or 3 and `bpi` 75 or 210; nothing is sent
    /// otherwise.
    pub fn set_density(&mut self, track: u8, bpi: u16) -> Result<()> {
        let track = TrackNumber::try_from(track)?;
        let bpi = Bpi::try_from(bpi)?;

        let setting = DENSITY_SETTINGS[track.index() * 2 + usize::from(bpi == Bpi::Bpi210)];
        debug!("Setting {} to {} (0x{:02X})", track, bpi, setting);

        let frame = CommandFrame::new(Opcode::SetDensity).with_params(vec![setting]);
        self.command(&frame, self.config.ack_status)
    }

    /// Set the bits per character used by raw reads and writes, per track
    pub fn set_bits_per_char(&mut self, track1: u8, track2: u8, track3: u8) -> Result<()> {
        debug!("Setting bits per char to {}/{}/{}", track1, track2, track3);
        let frame =
            CommandFrame::new(Opcode::SetBitsPerChar).with_params(vec![track1, track2, track3]);
        self.command(&frame, self.config.ack_status)?;

        // The device echoes the accepted settings
        let mut echo = [0u8; 3];
        self.transport.read_exact(&mut echo)?;
        trace!("Bits per char echo: {}", hex::encode(echo));

        Ok(())
    }

    /// Read a card in ISO mode
    ///
    /// The device decodes the stripe itself and sends text. A track that was
    /// reported but carried no data comes back empty.
    pub fn read_iso(&mut self) -> Result<IsoCard> {
        let tracks = self.read_card(Opcode::ReadIso, ParseMode::Iso)?;
        Ok(tracks.map(IsoTrack::new))
    }

    /// Read a card in raw mode
    pub fn read_raw(&mut self) -> Result<RawCard> {
        let tracks = self.read_card(Opcode::ReadRaw, ParseMode::Raw)?;
        Ok(tracks.map(RawTrack::new))
    }

    /// Read a card in raw mode and decode it on the host
    ///
    /// `widths` must match what [`set_bits_per_char`](Self::set_bits_per_char)
    /// configured. Parity is handled according to [`DeviceConfig::parity`].
    pub fn read_raw_decoded(&mut self, widths: [BitsPerChar; 3]) -> Result<IsoCard> {
        let raw = self.read_raw()?;
        card::decode_card(&raw, widths, self.config.parity)
    }

    /// Write raw tracks to the next swiped card
    ///
    /// Absent tracks are written with no data.
    pub fn write_raw(&mut self, card: &RawCard) -> Result<()> {
        let frame = CommandFrame::raw_write(card)?;
        debug!(
            "Writing raw card ({} tracks, {} bytes), swipe a card",
            card.count(),
            frame.size()
        );
        self.command(&frame, self.config.ack_status)
    }

    // Helper methods

    /// Send a command and check its two-byte acknowledgement
    fn command(&mut self, frame: &CommandFrame, expected: u8) -> Result<()> {
        self.send_command(frame)?;
        self.read_ack(expected)
    }

    fn send_command(&mut self, frame: &CommandFrame) -> Result<()> {
        trace!("Sending: {:?}", frame);

        self.transport.purge()?;
        self.transport.send(&frame.encode())?;

        if !frame.opcode.expects_response() {
            debug!("{} sent, no response expected", frame.opcode);
        } else if frame.opcode.waits_for_card() {
            info!("Waiting for card swipe ({})", frame.opcode);
        }
        Ok(())
    }

    fn read_escape(&mut self) -> Result<()> {
        let byte = self.transport.read_byte()?;
        Ack::check_escape(byte)?;
        Ok(())
    }

    fn read_ack(&mut self, expected: u8) -> Result<()> {
        let escape = self.transport.read_byte()?;
        Ack::check_escape(escape)?;
        let status = self.transport.read_byte()?;

        trace!("Received ack: {:02X} {:02X}", escape, status);

        if let Err(e) = Ack::new(escape, status).check(expected) {
            warn!("Command rejected: {}", e);
            return Err(e.into());
        }
        Ok(())
    }

    fn read_card(&mut self, opcode: Opcode, mode: ParseMode) -> Result<Tracks<Vec<u8>>> {
        self.send_command(&CommandFrame::new(opcode))?;
        self.read_escape()?;

        let mut parser = TrackParser::new(mode)
            .with_success_status(self.config.read_status)
            .with_max_track_len(self.config.max_track_len);

        loop {
            let byte = self.transport.read_byte()?;
            match parser.feed(byte) {
                Ok(Progress::NeedMore) => {}
                Ok(Progress::Complete) => break,
                Err(e) => {
                    if e.is_desync() {
                        warn!("Card data out of step in state {:?}: {}", parser.state(), e);
                    }
                    return Err(e.into());
                }
            }
        }

        let tracks = parser.finish()?;
        debug!("Card read complete ({} tracks)", tracks.count());
        Ok(tracks)
    }
}

fn invalid_argument(message: &str) -> Error {
    msrkit_core::Error::InvalidArgument(message.to_string()).into()
}
