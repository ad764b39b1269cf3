//! zipアーカイブ組み立て
//!
//! 生成されたテストファイルのマッピングをdeflate圧縮のzipにまとめ、
//! JSONレスポンスに埋め込めるようbase64エンコードする。

use base64::engine::general_purpose;
use base64::Engine;
use junitgen_common::error::{GeneratorError, GeneratorResult};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// ファイル名→コードのマッピングからzipアーカイブを構築する
pub fn build_zip(test_files: &HashMap<String, String>) -> GeneratorResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (file_name, code) in test_files {
        writer
            .start_file(file_name, options)
            .map_err(|e| GeneratorError::Archive(format!("Failed to start entry: {}", e)))?;
        writer
            .write_all(code.as_bytes())
            .map_err(GeneratorError::Io)?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| GeneratorError::Archive(format!("Failed to finalize archive: {}", e)))?;

    Ok(cursor.into_inner())
}

/// zipバイト列をbase64文字列にエンコードする
pub fn encode_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}
