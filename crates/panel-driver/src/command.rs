//! Command stream interpreter
//!
//! Executes a [`CommandSequence`] over a [`DsiHost`]: one packet per entry,
//! strictly in table order, with each entry's settle time honoured before the
//! next write. The first failure stops the table; nothing is retried.

use embedded_hal_async::delay::DelayNs;
use panel_hal::{DsiHost, Packet, MAX_PACKET_LEN};
use panel_specs::{CommandEntry, CommandSequence, Encoding};

use crate::error::{CommandError, CommandFault};
use crate::timing::wait_at_least;

/// Sends command tables on one virtual channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInterpreter {
    channel: u8,
}

impl CommandInterpreter {
    /// Interpreter for virtual channel `channel`.
    pub const fn new(channel: u8) -> Self {
        Self { channel }
    }

    /// Send every entry of `sequence` in order.
    ///
    /// On failure the error carries the index of the entry that failed;
    /// entries before it were delivered and entries after it were not sent.
    pub async fn run<H: DsiHost, D: DelayNs>(
        &self,
        sequence: &CommandSequence,
        host: &mut H,
        delay: &mut D,
    ) -> Result<(), CommandError<H::Error>> {
        debug!("sending {} sequence ({} commands)", sequence.name(), sequence.len());
        for (index, entry) in sequence.iter().enumerate() {
            if let Err(cause) = self.send(entry, host).await {
                warn!(
                    "{} sequence failed at entry {} (opcode {})",
                    sequence.name(),
                    index,
                    entry.opcode
                );
                return Err(CommandError {
                    sequence: sequence.name(),
                    index,
                    opcode: entry.opcode,
                    cause,
                });
            }
            if let Some(settle) = entry.post_delay {
                wait_at_least(delay, settle).await;
            }
        }
        Ok(())
    }

    /// Encode one entry and write it as a single packet.
    pub async fn send<H: DsiHost>(
        &self,
        entry: &CommandEntry,
        host: &mut H,
    ) -> Result<(), CommandFault<H::Error>> {
        entry.validate().map_err(CommandFault::Malformed)?;

        let mut buf: heapless::Vec<u8, MAX_PACKET_LEN> = heapless::Vec::new();
        // Lengths were checked by validate() above.
        let _ = buf.push(entry.opcode);
        let _ = buf.extend_from_slice(entry.payload);

        // Two parameters no longer fit a short packet header.
        let packet = match entry.encoding {
            Encoding::Short => Packet::dcs(self.channel, &buf),
            Encoding::Long => Packet::dcs_long(self.channel, &buf),
        };
        trace!("dsi write: opcode {} ({} bytes)", entry.opcode, buf.len());
        host.write(&packet).await.map_err(CommandFault::Transport)
    }
}

/// Write a DCS command, picking the short or long encoding by length.
pub async fn dcs_write<H: DsiHost>(host: &mut H, channel: u8, data: &[u8]) -> Result<(), H::Error> {
    host.write(&Packet::dcs(channel, data)).await
}
