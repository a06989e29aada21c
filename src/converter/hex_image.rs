//! 十六进制图片负载解码
//!
//! 后端把 JPEG 字节以小写十六进制串放在 image_data 字段中

use hex::FromHexError;

pub const JPEG_MIME: &str = "image/jpeg";

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// 将十六进制串解码为字节
///
/// 长度必须为偶数，每两个字符对应一个字节，大小写均可
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, FromHexError> {
    let bytes = hex::decode(payload)?;
    if !looks_like_jpeg(&bytes) {
        tracing::warn!(
            "[IMAGE] 图片负载缺少 JPEG 起始标记，仍按 {} 处理 ({} bytes)",
            JPEG_MIME,
            bytes.len()
        );
    }
    Ok(bytes)
}

/// 检查 JPEG SOI 标记
pub fn looks_like_jpeg(bytes: &[u8]) -> bool {
    bytes.starts_with(&JPEG_SOI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_known_payload() {
        assert_eq!(
            decode_image_payload("ffd8FFe0").unwrap(),
            vec![0xFF, 0xD8, 0xFF, 0xE0]
        );
        assert_eq!(decode_image_payload("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_odd_length_is_rejected() {
        assert_eq!(
            decode_image_payload("ffd"),
            Err(FromHexError::OddLength)
        );
    }

    #[test]
    fn test_non_hex_is_rejected() {
        assert!(matches!(
            decode_image_payload("ffzz"),
            Err(FromHexError::InvalidHexCharacter { c: 'z', index: 2 })
        ));
    }

    #[test]
    fn test_jpeg_marker() {
        assert!(looks_like_jpeg(&[0xFF, 0xD8, 0x00]));
        assert!(!looks_like_jpeg(&[0x89, 0x50]));
        assert!(!looks_like_jpeg(&[]));
    }

    proptest! {
        #[test]
        fn prop_decode_matches_encoding(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let lower = hex::encode(&bytes);
            let upper = lower.to_uppercase();
            prop_assert_eq!(decode_image_payload(&lower).unwrap(), bytes.clone());
            prop_assert_eq!(decode_image_payload(&upper).unwrap().len(), lower.len() / 2);
        }

        #[test]
        fn prop_odd_length_always_fails(s in "[0-9a-fA-F]{0,64}") {
            let odd = format!("{}a", s.get(..s.len() - s.len() % 2).unwrap_or(""));
            prop_assert_eq!(decode_image_payload(&odd), Err(FromHexError::OddLength));
        }
    }
}
