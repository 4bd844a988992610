use crate::byte_source::ByteSource;
use crate::cursor::read_u32;
use crate::error::ExtraDataError;

/// The ConsoleCodepageDataBlock structure specifies the code page to use for displaying text when a
/// link target specifies an application that is run in a console window. Known as `ConsoleFEDataBlock`
/// in [MS-SHLLINK]; renamed here for what it actually carries.
#[derive(Clone, Debug, Default)]
pub struct ConsoleCodepageDataBlock {
    /// A 32-bit, unsigned integer that specifies a code page language code identifier. For details concerning the structure and meaning of language code identifiers, see [MS-LCID].
    pub code_page: u32,
}

impl ConsoleCodepageDataBlock {
    /// Decodes a `ConsoleCodepageDataBlock` from the bytes following a data
    /// block's signature.
    pub(crate) fn new(cursor: &mut impl ByteSource) -> Result<Self, ExtraDataError> {
        Ok(Self {
            code_page: read_u32(cursor).map_err(|_| {
                ExtraDataError::ShortInput(crate::error::Breadcrumb::new(
                    "ConsoleCodepageDataBlock",
                    "code_page",
                    cursor.position(),
                ))
            })?,
        })
    }
}
