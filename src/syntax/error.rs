//! Fatal scan errors.

use text_size::TextSize;

use super::region::Region;

/// A region nesting error that aborts the scan.
///
/// Every variant carries the byte offset where scanning stopped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("cannot enter `{attempted}` region at offset {offset:?}: current region is `{top}`")]
    DisallowedTransfer {
        offset: TextSize,
        top: Region,
        attempted: Region,
    },

    #[error("cannot exit `{exiting}` region at offset {offset:?}: current region is `{top}`")]
    UnexpectedExit {
        offset: TextSize,
        top: Region,
        exiting: Region,
    },

    #[error("cannot exit `{exiting}` region at offset {offset:?}: no region is open")]
    EmptyStack { offset: TextSize, exiting: Region },

    #[error("missing end of `{region}` region at offset {offset:?}")]
    Unterminated { offset: TextSize, region: Region },
}

impl ScanError {
    /// Byte offset at which the scanner gave up.
    pub fn offset(&self) -> TextSize {
        match self {
            ScanError::DisallowedTransfer { offset, .. }
            | ScanError::UnexpectedExit { offset, .. }
            | ScanError::EmptyStack { offset, .. }
            | ScanError::Unterminated { offset, .. } => *offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = ScanError::DisallowedTransfer {
            offset: TextSize::from(12),
            top: Region::TemplateTag,
            attempted: Region::TemplateTag,
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("TemplateTag"));

        let err = ScanError::Unterminated {
            offset: TextSize::from(4),
            region: Region::MarkupTag,
        };
        assert_eq!(err.to_string(), "missing end of `MarkupTag` region at offset 4");
        assert_eq!(err.offset(), TextSize::from(4));
    }
}
