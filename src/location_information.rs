//! Definitions for the
//! [LinkInfo](https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-shllink/6813269d-0cc8-4be2-933f-e96e8e3412dc)
//! type, renamed `LocationInformation` here to match what it actually
//! describes: where to find the target if it isn't where the link left it.

use crate::byte_source::ByteSource;
use crate::codepage::Codepage;
use crate::cursor::{find_nul, find_nul16, read_exact_vec, read_u32};
use crate::error::{Breadcrumb, LocationInformationError};
use crate::{header::ShellLinkHeader, LinkFlags};
use bitflags::bitflags;
use std::io::Cursor;

const SECTION: &str = "LocationInformation";

bitflags! {
    /// Flags that specify whether the VolumeID/LocalBasePath and
    /// CommonNetworkRelativeLink fields are present.
    pub struct LocationInformationFlags: u32 {
        /// VolumeID and LocalBasePath (and, if the header is long enough,
        /// LocalBasePathUnicode) are present.
        const VOLUME_ID_AND_LOCAL_BASE_PATH = 0b0000_0000_0000_0000_0000_0000_0000_0001;

        /// CommonNetworkRelativeLink is present.
        const COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX = 0b0000_0000_0000_0000_0000_0000_0000_0010;
    }
}

/// Information about the volume the link target was on when the link was
/// created: drive type, serial number, and an optional volume label.
#[derive(Clone, Debug, Default)]
pub struct VolumeInformation {
    /// The size, in bytes, of this sub-record.
    pub size: u32,
    /// A value indicating the drive type (removable, fixed, network, ...).
    pub drive_type: u32,
    /// The drive's serial number.
    pub drive_serial_number: u32,
    /// The volume label, if present.
    pub volume_label: Option<String>,
    /// Whether `volume_label` came from the Unicode mirror rather than the
    /// ANSI half.
    pub volume_label_is_unicode: bool,
}

/// Information about a UNC network location the link target was stored at.
#[derive(Clone, Debug, Default)]
pub struct NetworkShareInformation {
    /// A value indicating the kind of share (disk, print, ...).
    pub share_type: u32,
    /// The share name, if present.
    pub share_name: Option<String>,
    /// Whether `share_name` came from the Unicode mirror.
    pub share_name_is_unicode: bool,
    /// The mapped device name (drive letter), if present.
    pub device_name: Option<String>,
    /// Whether `device_name` came from the Unicode mirror.
    pub device_name_is_unicode: bool,
    /// A value indicating the network provider that owns this share.
    pub network_provider_type: u32,
}

/// The LocationInformation structure specifies information necessary to resolve a link target if it is
/// not found in its original location. This includes information about the volume that the target was
/// stored on, the mapped drive letter, and a Universal Naming Convention (UNC) form of the path if one
/// existed when the link was created.
#[derive(Clone, Debug, Default)]
pub struct LocationInformation {
    /// The size, in bytes, of the LocationInformation header section. One of
    /// 28, 32, or 36.
    pub header_size: u32,

    /// Flags specifying which of the fields below are present.
    pub flags: LocationInformationFlags,

    /// Present if `flags` has `VOLUME_ID_AND_LOCAL_BASE_PATH` set.
    pub volume_information: Option<VolumeInformation>,

    /// Present if `flags` has `COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX` set.
    pub network_share_information: Option<NetworkShareInformation>,

    /// Used, together with `common_path`, to construct the full path to the
    /// link target when `volume_information` is present.
    pub local_path: Option<String>,
    /// Whether `local_path` came from the Unicode mirror.
    pub local_path_is_unicode: bool,

    /// Appended to `local_path` (or to the network share's path) to
    /// construct the full path to the link target.
    pub common_path: Option<String>,
    /// Whether `common_path` came from the Unicode mirror.
    pub common_path_is_unicode: bool,
}

impl LocationInformation {
    /// Reads a `LocationInformation` section from `cursor`, or returns an
    /// empty one if `header`'s `HAS_LINK_INFO` flag isn't set.
    pub fn new(
        cursor: &mut impl ByteSource,
        header: &ShellLinkHeader,
        codepage: Codepage,
    ) -> Result<Self, LocationInformationError> {
        if !header.link_flags.contains(LinkFlags::HAS_LINK_INFO) {
            return Ok(Self::default());
        }

        let record_start = cursor.position();
        let total_size = read_u32(cursor).map_err(|_| {
            LocationInformationError::ShortInput(Breadcrumb::new(
                SECTION,
                "total_size",
                record_start,
            ))
        })?;

        if total_size <= 4 {
            return Ok(Self::default());
        }

        let body_start = cursor.position();
        let body = read_exact_vec(cursor, (total_size - 4) as usize).map_err(|_| {
            LocationInformationError::ShortInput(Breadcrumb::new(SECTION, "body", body_start))
        })?;

        let mut body_cursor = Cursor::new(body.clone());
        let header_size = read_u32(&mut body_cursor).map_err(|_| {
            LocationInformationError::ShortInput(Breadcrumb::new(
                SECTION,
                "header_size",
                body_start,
            ))
        })?;
        if header_size != 28 && header_size != 32 && header_size != 36 {
            return Err(LocationInformationError::BadHeaderSize(
                header_size,
                Breadcrumb::new(SECTION, "header_size", body_start),
            ));
        }

        let flags = LocationInformationFlags::from_bits_truncate(
            read_u32(&mut body_cursor).map_err(|_| {
                LocationInformationError::ShortInput(Breadcrumb::new(
                    SECTION,
                    "flags",
                    body_start + 4,
                ))
            })?,
        );
        let volume_info_offset = read_u32(&mut body_cursor).unwrap_or(0);
        let local_base_path_offset = read_u32(&mut body_cursor).unwrap_or(0);
        let network_share_info_offset = read_u32(&mut body_cursor).unwrap_or(0);
        let common_path_suffix_offset = read_u32(&mut body_cursor).unwrap_or(0);
        let local_base_path_offset_unicode = if header_size > 28 {
            read_u32(&mut body_cursor).unwrap_or(0)
        } else {
            0
        };
        let common_path_suffix_offset_unicode = if header_size > 32 {
            read_u32(&mut body_cursor).unwrap_or(0)
        } else {
            0
        };

        let validate_offset = |offset: u32, field: &'static str| -> Result<(), LocationInformationError> {
            if offset == 0 {
                return Ok(());
            }
            if offset < header_size || (offset - 4) as usize >= body.len() {
                return Err(LocationInformationError::OffsetOutOfRange(Breadcrumb::new(
                    SECTION,
                    field,
                    body_start + offset as u64,
                )));
            }
            Ok(())
        };
        validate_offset(volume_info_offset, "volume_id_offset")?;
        validate_offset(local_base_path_offset, "local_base_path_offset")?;
        validate_offset(network_share_info_offset, "common_network_relative_link_offset")?;
        validate_offset(common_path_suffix_offset, "common_path_suffix_offset")?;
        validate_offset(local_base_path_offset_unicode, "local_base_path_offset_unicode")?;
        validate_offset(common_path_suffix_offset_unicode, "common_path_suffix_offset_unicode")?;

        let volume_information = if volume_info_offset != 0 {
            Some(Self::read_volume_information(
                &body,
                volume_info_offset as usize - 4,
                codepage,
            )?)
        } else {
            None
        };

        let network_share_information = if network_share_info_offset != 0 {
            Some(Self::read_network_share_information(
                &body,
                network_share_info_offset as usize - 4,
                codepage,
            )?)
        } else {
            None
        };

        let (local_path, local_path_is_unicode) = Self::read_mirrored_string(
            &body,
            local_base_path_offset,
            local_base_path_offset_unicode,
            "local_base_path",
            codepage,
        )?;

        let (common_path, common_path_is_unicode) = Self::read_mirrored_string(
            &body,
            common_path_suffix_offset,
            common_path_suffix_offset_unicode,
            "common_path_suffix",
            codepage,
        )?;

        cursor
            .seek(record_start + total_size as u64)
            .map_err(|_| {
                LocationInformationError::ShortInput(Breadcrumb::new(
                    SECTION,
                    "total_size",
                    record_start,
                ))
            })?;

        Ok(Self {
            header_size,
            flags,
            volume_information,
            network_share_information,
            local_path,
            local_path_is_unicode,
            common_path,
            common_path_is_unicode,
        })
    }

    fn read_volume_information(
        body: &[u8],
        start: usize,
        codepage: Codepage,
    ) -> Result<VolumeInformation, LocationInformationError> {
        let mut c = Cursor::new(body[start..].to_vec());
        let size = read_u32(&mut c).unwrap_or(0);
        let drive_type = read_u32(&mut c).unwrap_or(0);
        let drive_serial_number = read_u32(&mut c).unwrap_or(0);
        let volume_label_offset = read_u32(&mut c).unwrap_or(0);
        let unicode_offset = if volume_label_offset > 16 {
            read_u32(&mut c).ok()
        } else {
            None
        };

        let (volume_label, volume_label_is_unicode) = Self::read_mirrored_string_at(
            body,
            start,
            volume_label_offset,
            unicode_offset,
            "volume_label",
            codepage,
        )?;

        Ok(VolumeInformation {
            size,
            drive_type,
            drive_serial_number,
            volume_label,
            volume_label_is_unicode,
        })
    }

    fn read_network_share_information(
        body: &[u8],
        start: usize,
        codepage: Codepage,
    ) -> Result<NetworkShareInformation, LocationInformationError> {
        let mut c = Cursor::new(body[start..].to_vec());
        let _size = read_u32(&mut c).unwrap_or(0);
        let share_type = read_u32(&mut c).unwrap_or(0);
        let network_share_name_offset = read_u32(&mut c).unwrap_or(0);
        let device_name_offset = read_u32(&mut c).unwrap_or(0);
        let network_provider_type = read_u32(&mut c).unwrap_or(0);
        let (unicode_share_offset, unicode_device_offset) = if network_share_name_offset > 20 {
            (read_u32(&mut c).ok(), read_u32(&mut c).ok())
        } else {
            (None, None)
        };

        let (share_name, share_name_is_unicode) = Self::read_mirrored_string_at(
            body,
            start,
            network_share_name_offset,
            unicode_share_offset,
            "network_share_name",
            codepage,
        )?;
        let (device_name, device_name_is_unicode) = Self::read_mirrored_string_at(
            body,
            start,
            device_name_offset,
            unicode_device_offset,
            "device_name",
            codepage,
        )?;

        Ok(NetworkShareInformation {
            share_type,
            share_name,
            share_name_is_unicode,
            device_name,
            device_name_is_unicode,
            network_provider_type,
        })
    }

    /// Reads an ANSI string at `body[offset - 4]`, and its Unicode mirror at
    /// `body[unicode_offset - 4]` when `unicode_offset != 0`, preferring the
    /// mirror as canonical. `offset == 0` means the field is absent.
    fn read_mirrored_string(
        body: &[u8],
        offset: u32,
        unicode_offset: u32,
        field: &'static str,
        codepage: Codepage,
    ) -> Result<(Option<String>, bool), LocationInformationError> {
        if offset == 0 {
            return Ok((None, false));
        }
        Self::read_mirrored_string_at(
            body,
            0,
            offset - 4,
            if unicode_offset != 0 {
                Some(unicode_offset - 4)
            } else {
                None
            },
            field,
            codepage,
        )
    }

    /// Like `read_mirrored_string`, but `offset`/`unicode_offset` are already
    /// relative to `base` (used when decoding inside a sub-record).
    fn read_mirrored_string_at(
        body: &[u8],
        base: usize,
        offset: u32,
        unicode_offset: Option<u32>,
        field: &'static str,
        codepage: Codepage,
    ) -> Result<(Option<String>, bool), LocationInformationError> {
        if offset == 0 && unicode_offset.is_none() {
            return Ok((None, false));
        }

        let ansi_abs = base + offset as usize;
        let ansi = if ansi_abs <= body.len() {
            Some(Self::decode_ansi(body, ansi_abs, field, codepage)?)
        } else {
            None
        };

        if let Some(u_off) = unicode_offset {
            let unicode_abs = base + u_off as usize;
            let unicode = Self::decode_utf16(body, unicode_abs, field)?;
            return Ok((Some(unicode), true));
        }

        Ok((ansi, false))
    }

    fn decode_ansi(
        body: &[u8],
        start: usize,
        field: &'static str,
        codepage: Codepage,
    ) -> Result<String, LocationInformationError> {
        let slice = body.get(start..).ok_or_else(|| {
            LocationInformationError::OffsetOutOfRange(Breadcrumb::new(
                SECTION,
                field,
                start as u64,
            ))
        })?;
        let len = find_nul(slice).ok_or_else(|| {
            LocationInformationError::UnterminatedString(Breadcrumb::new(
                SECTION,
                field,
                start as u64,
            ))
        })?;
        Ok(codepage.copy_from_ansi(&slice[..len]))
    }

    fn decode_utf16(
        body: &[u8],
        start: usize,
        field: &'static str,
    ) -> Result<String, LocationInformationError> {
        let slice = body.get(start..).ok_or_else(|| {
            LocationInformationError::OffsetOutOfRange(Breadcrumb::new(
                SECTION,
                field,
                start as u64,
            ))
        })?;
        let len_units = find_nul16(slice).ok_or_else(|| {
            LocationInformationError::UnterminatedString(Breadcrumb::new(
                SECTION,
                field,
                start as u64,
            ))
        })?;
        Ok(crate::codepage::copy_from_utf16le(&slice[..len_units * 2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    fn header_with_link_info() -> ShellLinkHeader {
        let mut bytes = Vec::with_capacity(76);
        bytes.extend_from_slice(&76u32.to_le_bytes());
        bytes.extend_from_slice(&crate::header::CLASS_IDENTIFIER.to_le_bytes());
        bytes.extend_from_slice(&LinkFlags::HAS_LINK_INFO.bits().to_le_bytes());
        bytes.extend_from_slice(&[0u8; 76 - 4 - 16 - 4]);
        let mut cursor = Cursor::new(bytes);
        ShellLinkHeader::try_from(&mut cursor).unwrap()
    }

    #[test]
    fn absent_when_flag_unset() {
        let mut bytes = Vec::with_capacity(76);
        bytes.extend_from_slice(&76u32.to_le_bytes());
        bytes.extend_from_slice(&crate::header::CLASS_IDENTIFIER.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 76 - 4 - 16 - 4]);
        let mut cursor = Cursor::new(bytes);
        let header = ShellLinkHeader::try_from(&mut cursor).unwrap();

        let mut rest = Cursor::new(Vec::new());
        let info = LocationInformation::new(&mut rest, &header, Codepage::Ascii).unwrap();
        assert!(info.local_path.is_none());
    }

    #[test]
    fn empty_section_is_total_size_four_or_less() {
        let header = header_with_link_info();
        let mut rest = Cursor::new(4u32.to_le_bytes().to_vec());
        let info = LocationInformation::new(&mut rest, &header, Codepage::Ascii).unwrap();
        assert!(info.local_path.is_none());
        assert!(info.volume_information.is_none());
    }

    #[test]
    fn decodes_local_and_common_path() {
        let header = header_with_link_info();

        // header_size(28) + flags + 4 offsets = 24 bytes, then strings.
        let local_path_offset: u32 = 4 + 24;
        let local_path = b"C:\\Windows\\";
        let common_path_offset = local_path_offset + local_path.len() as u32 + 1;
        let common_path = b"notepad.exe";

        let mut body = Vec::new();
        body.extend_from_slice(&28u32.to_le_bytes()); // header_size
        body.extend_from_slice(&LocationInformationFlags::VOLUME_ID_AND_LOCAL_BASE_PATH.bits().to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes()); // volume_id_offset
        body.extend_from_slice(&local_path_offset.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes()); // common_network_relative_link_offset
        body.extend_from_slice(&common_path_offset.to_le_bytes());
        body.extend_from_slice(local_path);
        body.push(0);
        body.extend_from_slice(common_path);
        body.push(0);

        let total_size = body.len() as u32 + 4;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&total_size.to_le_bytes());
        bytes.extend_from_slice(&body);

        let mut cursor = Cursor::new(bytes);
        let info = LocationInformation::new(&mut cursor, &header, Codepage::Ascii).unwrap();
        assert_eq!(info.local_path.as_deref(), Some("C:\\Windows\\"));
        assert_eq!(info.common_path.as_deref(), Some("notepad.exe"));
        assert!(!info.local_path_is_unicode);
    }

    #[test]
    fn rejects_bad_header_size() {
        let header = header_with_link_info();
        let mut body = Vec::new();
        body.extend_from_slice(&99u32.to_le_bytes());
        body.extend_from_slice(&[0u8; 20]);
        let total_size = body.len() as u32 + 4;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&total_size.to_le_bytes());
        bytes.extend_from_slice(&body);
        let mut cursor = Cursor::new(bytes);
        let err = LocationInformation::new(&mut cursor, &header, Codepage::Ascii).unwrap_err();
        assert!(matches!(err, LocationInformationError::BadHeaderSize(99, _)));
    }
}
