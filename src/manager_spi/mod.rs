pub mod errors;

use log::{debug, info};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use crate::initialization::SpiConfig;
use crate::manager_spi::errors::SpiError;

const BITS_PER_WORD: u8 = 8;

/// Angle command for the tracker positioner
///
/// On the wire a command is always four bytes, two big-endian words. A single angle
/// goes in the second word with the first word left at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleCommand {
    Single(u16),
    Pair(u16, u16),
}

impl AngleCommand {
    pub fn to_frame(&self) -> [u8; 4] {
        let (first, second) = match *self {
            AngleCommand::Single(angle) => (0, angle),
            AngleCommand::Pair(first, second) => (first, second),
        };
        let [f_hi, f_lo] = first.to_be_bytes();
        let [s_hi, s_lo] = second.to_be_bytes();

        [f_hi, f_lo, s_hi, s_lo]
    }
}

/// Anything that can push bytes out on an SPI bus
pub trait SpiWrite {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, SpiError>;
}

impl SpiWrite for Spi {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, SpiError> {
        Ok(self.write(data)?)
    }
}

/// Writes angle commands to the tracker positioner, no response is read back
pub struct AngleWriter<W: SpiWrite> {
    bus: W,
}

impl AngleWriter<Spi> {

    /// Opens and configures the SPI device given by bus and chip select
    ///
    /// # Arguments
    ///
    /// * 'config' - bus, chip select, mode and clock speed
    pub fn open(config: &SpiConfig) -> Result<Self, SpiError> {
        let mut spi = Spi::new(bus(config.bus)?, slave_select(config.slave_select)?, config.clock_speed, mode(config.mode)?)?;
        spi.set_bits_per_word(BITS_PER_WORD)?;
        debug!("opened spi{}.{} mode {} at {} Hz", config.bus, config.slave_select, config.mode, config.clock_speed);

        Ok(Self::new(spi))
    }
}

impl<W: SpiWrite> AngleWriter<W> {
    pub fn new(bus: W) -> Self {
        Self { bus }
    }

    /// Sends one command frame
    ///
    /// # Arguments
    ///
    /// * 'command' - the angle(s) to send
    pub fn write(&mut self, command: AngleCommand) -> Result<(), SpiError> {
        let frame = command.to_frame();
        let written = self.bus.write_bytes(&frame)?;
        if written != frame.len() {
            return Err(SpiError::HardwareIo(format!("short write, {} of {} bytes", written, frame.len())));
        }

        Ok(())
    }
}

/// Opens the device, writes one command and closes the device again
///
/// # Arguments
///
/// * 'config' - SPI device configuration
/// * 'command' - the angle(s) to send
pub fn write_angles(config: &SpiConfig, command: AngleCommand) -> Result<(), SpiError> {
    AngleWriter::open(config)?.write(command)?;
    info!("sent {:?} to spi{}.{}", command, config.bus, config.slave_select);

    Ok(())
}

fn bus(bus: u8) -> Result<Bus, SpiError> {
    match bus {
        0 => Ok(Bus::Spi0),
        1 => Ok(Bus::Spi1),
        2 => Ok(Bus::Spi2),
        3 => Ok(Bus::Spi3),
        4 => Ok(Bus::Spi4),
        5 => Ok(Bus::Spi5),
        6 => Ok(Bus::Spi6),
        _ => Err(SpiError::InvalidArgument(format!("no spi bus {}", bus))),
    }
}

fn slave_select(ss: u8) -> Result<SlaveSelect, SpiError> {
    match ss {
        0 => Ok(SlaveSelect::Ss0),
        1 => Ok(SlaveSelect::Ss1),
        2 => Ok(SlaveSelect::Ss2),
        _ => Err(SpiError::InvalidArgument(format!("no chip select {}", ss))),
    }
}

fn mode(mode: u8) -> Result<Mode, SpiError> {
    match mode {
        0 => Ok(Mode::Mode0),
        1 => Ok(Mode::Mode1),
        2 => Ok(Mode::Mode2),
        3 => Ok(Mode::Mode3),
        _ => Err(SpiError::InvalidArgument(format!("spi mode must be 0-3, got {}", mode))),
    }
}
