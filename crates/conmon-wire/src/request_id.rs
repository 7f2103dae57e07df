// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request/response correlation id carried in routing frames.

use crate::body::{BodyReader, BodyWriter};
use conmon_support::ConmonError;

/// Opaque correlation id a routing request frame carries and its response
/// echoes back, so the request table (see `routing-client`) can match a
/// reply to the pending slot that sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u32);

impl RequestId {
    pub fn write(self, writer: &mut BodyWriter<'_>) -> Result<(), ConmonError> {
        writer.write_u32_le(self.0)
    }

    pub fn read(reader: &mut BodyReader<'_>) -> Result<Self, ConmonError> {
        Ok(Self(reader.read_u32_le()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodySize;

    #[test]
    fn request_id_roundtrips() {
        let mut buf = [0u8; 4];
        let mut size = BodySize::new(4);
        RequestId(0xCAFE_F00D)
            .write(&mut BodyWriter::new(&mut buf, &mut size))
            .unwrap();
        let mut reader = BodyReader::new(&buf, BodySize::at(4, 4));
        assert_eq!(RequestId::read(&mut reader).unwrap(), RequestId(0xCAFE_F00D));
    }
}
