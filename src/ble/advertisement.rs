//! AD structure scanning
//!
//! An advertisement payload is a packed sequence of AD structures with no
//! padding between them: `length:u8` (covering the type byte and the data),
//! `type:u8`, then `length - 1` data bytes. The scan position after one
//! structure is `offset + 1 + length`.

use super::BleAdError;

/// AD type code for Service Data - 16-bit UUID.
pub const AD_TYPE_SERVICE_DATA_16: u8 = 0x16;

/// A borrowed view of one AD structure within an advertisement payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdStructure<'a> {
    /// Byte offset of the structure's length byte within the payload.
    pub offset: usize,
    /// AD type code.
    pub ad_type: u8,
    /// Data bytes following the type byte.
    pub data: &'a [u8],
}

impl<'a> AdStructure<'a> {
    /// Full structure size including the length byte.
    pub fn size(&self) -> usize {
        2 + self.data.len()
    }
}

/// Iterator over the packed AD structures of an advertisement payload.
///
/// Iteration ends when the payload is exhausted. A zero length byte, or a
/// declared length whose data would overrun the payload, yields a single
/// [`BleAdError::Malformed`] and ends iteration; nothing after the broken
/// structure is trusted.
pub struct AdStructures<'a> {
    payload: &'a [u8],
    offset: usize,
    index: usize,
    done: bool,
}

impl<'a> AdStructures<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            offset: 0,
            index: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for AdStructures<'a> {
    type Item = Result<AdStructure<'a>, BleAdError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.payload.len() {
            return None;
        }

        let length = self.payload[self.offset] as usize;
        if length == 0 || self.offset + 1 + length > self.payload.len() {
            self.done = true;
            return Some(Err(BleAdError::Malformed {
                index: self.index,
                offset: self.offset,
                length,
                total: self.payload.len(),
            }));
        }

        let structure = AdStructure {
            offset: self.offset,
            ad_type: self.payload[self.offset + 1],
            data: &self.payload[self.offset + 2..self.offset + 1 + length],
        };

        self.offset += 1 + length;
        self.index += 1;

        Some(Ok(structure))
    }
}

/// The Service Data (16-bit UUID) element of an advertisement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceData16<'a> {
    /// 16-bit service UUID, canonical big-endian value. The two bytes appear
    /// least-significant first on the wire.
    pub uuid: u16,
    /// First byte of the vendor payload, selecting the frame layout.
    pub frame_type: u8,
    /// Vendor payload after the frame-type byte. May be empty.
    pub body: &'a [u8],
}

impl ServiceData16<'_> {
    /// Canonical uppercase hex rendering of the service UUID.
    pub fn uuid_hex(&self) -> String {
        format!("{:04X}", self.uuid)
    }
}

/// Find the first Service Data (16-bit UUID) structure in a raw advertisement.
///
/// Walks every AD structure in order and returns on the first one of type
/// `0x16`; structures past the match are not scanned. A usable Service Data
/// structure needs `length >= 4` (type byte, two UUID bytes, at least the
/// frame-type byte); a shorter one is malformed.
///
/// Absence and malformation are both plain `Err` values so the caller has a
/// single rejection path; many advertisements legitimately carry no Service
/// Data at all.
pub fn extract_service_data16(payload: &[u8]) -> Result<ServiceData16<'_>, BleAdError> {
    let mut scanned = 0;

    for (index, structure) in AdStructures::new(payload).enumerate() {
        let structure = structure?;
        scanned += 1;

        log::debug!(
            "AD {} len={} type=0x{:02X}",
            index,
            structure.data.len() + 1,
            structure.ad_type
        );

        if structure.ad_type != AD_TYPE_SERVICE_DATA_16 {
            continue;
        }

        if structure.data.len() < 3 {
            log::debug!("AD {} type=0x16 too short length={}", index, structure.data.len() + 1);
            return Err(BleAdError::Malformed {
                index,
                offset: structure.offset,
                length: structure.data.len() + 1,
                total: payload.len(),
            });
        }

        let service_data = ServiceData16 {
            uuid: u16::from_le_bytes([structure.data[0], structure.data[1]]),
            frame_type: structure.data[2],
            body: &structure.data[3..],
        };

        log::debug!(
            "AD {} service data uuid={} frame=0x{:02X} body_len={}",
            index,
            service_data.uuid_hex(),
            service_data.frame_type,
            service_data.body.len()
        );

        return Ok(service_data);
    }

    Err(BleAdError::ServiceDataNotFound { structures: scanned })
}
