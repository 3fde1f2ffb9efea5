//! Digital I/O port layout
//!
//! A port is a group of eight pins sharing three registers: a direction
//! register (1 = output), an output data register and an input status
//! register. Chips describe which ports they have with a [`PortMap`].

/// Number of pins per port
pub const PORT_WIDTH: u8 = 8;

/// Identifier of a port group
///
/// The set is closed. Raw identifiers coming from configuration are
/// converted with `TryFrom`, which rejects anything outside A-D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PortId {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

impl PortId {
    /// Every port identifier, in table order
    pub const ALL: [PortId; 4] = [PortId::A, PortId::B, PortId::C, PortId::D];

    /// Port letter as written on datasheets and silkscreens
    pub const fn letter(self) -> char {
        match self {
            PortId::A => 'A',
            PortId::B => 'B',
            PortId::C => 'C',
            PortId::D => 'D',
        }
    }

    /// Position of the port in a [`PortMap`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A raw port identifier that names no port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidPortId(pub u8);

impl TryFrom<u8> for PortId {
    type Error = InvalidPortId;

    /// Accepts the ASCII letters `A`-`D` (either case)
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase() {
            b'A' => Ok(PortId::A),
            b'B' => Ok(PortId::B),
            b'C' => Ok(PortId::C),
            b'D' => Ok(PortId::D),
            _ => Err(InvalidPortId(value)),
        }
    }
}

impl TryFrom<char> for PortId {
    type Error = InvalidPortId;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        if value.is_ascii() {
            PortId::try_from(value as u8)
        } else {
            Err(InvalidPortId(0xFF))
        }
    }
}

/// Register triple of one port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Port {
    /// Data direction register (bit set = output)
    pub direction: crate::Register,
    /// Output data register
    pub output: crate::Register,
    /// Input status register
    pub input: crate::Register,
}

/// Port lookup table for one chip
///
/// Ports a chip does not implement are `None`; lookups for them fail the
/// same way for every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortMap {
    ports: [Option<Port>; 4],
}

impl PortMap {
    /// Build a table from per-port entries in A-D order
    pub const fn new(ports: [Option<Port>; 4]) -> Self {
        Self { ports }
    }

    /// Registers of `id`, if the chip has that port
    pub const fn get(&self, id: PortId) -> Option<Port> {
        self.ports[id.index()]
    }

    /// Check whether the chip has port `id`
    pub const fn contains(&self, id: PortId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over the ports present on the chip
    pub fn iter(&self) -> impl Iterator<Item = (PortId, Port)> + '_ {
        PortId::ALL
            .into_iter()
            .filter_map(move |id| self.get(id).map(|port| (id, port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Register;

    fn port(base: u8) -> Port {
        Port {
            input: Register::new(base),
            direction: Register::new(base + 1),
            output: Register::new(base + 2),
        }
    }

    #[test]
    fn test_port_id_from_letter() {
        assert_eq!(PortId::try_from(b'A'), Ok(PortId::A));
        assert_eq!(PortId::try_from(b'd'), Ok(PortId::D));
        assert_eq!(PortId::try_from('C'), Ok(PortId::C));
        assert_eq!(PortId::try_from(b'E'), Err(InvalidPortId(b'E')));
        assert_eq!(PortId::try_from(0u8), Err(InvalidPortId(0)));
        assert!(PortId::try_from('ä').is_err());
    }

    #[test]
    fn test_letter_roundtrip() {
        for id in PortId::ALL {
            assert_eq!(PortId::try_from(id.letter()), Ok(id));
        }
    }

    #[test]
    fn test_map_lookup_and_missing_port() {
        let map = PortMap::new([None, Some(port(0x36)), Some(port(0x33)), Some(port(0x30))]);

        assert!(!map.contains(PortId::A));
        assert_eq!(map.get(PortId::B), Some(port(0x36)));

        assert!(map
            .iter()
            .map(|(id, _)| id)
            .eq([PortId::B, PortId::C, PortId::D]));
    }
}
