//! Disk storage for proxied file uploads.
//!
//! Everything lands under the configured upload root, which is also served
//! statically under `/uploads/`. Filenames are sanitized and timestamped so
//! concurrent uploads of the same file never collide.

use std::path::{Path, PathBuf};

/// Subdirectory for product images (`POST /orders/com-imagem`).
pub const IMAGES_SUBDIR: &str = "imagens";

/// Subdirectory for invoice documents (`POST /orders/{id}/upload-nota`).
pub const INVOICES_SUBDIR: &str = "notas";

/// Subdirectory for ad-hoc email attachments (`POST /orders/{id}/enviar-email`).
pub const TEMP_SUBDIR: &str = "temp";

/// Extensions accepted for ad-hoc email attachments.
pub const ALLOWED_ATTACHMENT_EXTS: [&str; 4] = ["jpg", "jpeg", "png", "pdf"];

/// Whether a filename carries one of the allowed attachment extensions
/// (case-insensitive).
pub fn has_allowed_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| ALLOWED_ATTACHMENT_EXTS.contains(&e.as_str()))
}

/// Strip any path components from a client-supplied filename and normalize
/// it: whitespace becomes `_`, anything outside `[A-Za-z0-9._-]` is removed.
pub fn sanitize_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    basename
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Sanitized filename with a millisecond timestamp before the extension,
/// e.g. `ordem_1719000000000.pdf`.
pub fn timestamped_name(filename: &str) -> String {
    let clean = sanitize_filename(filename);
    let stamp = chrono::Utc::now().timestamp_millis();
    match clean.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => format!("{base}_{stamp}.{ext}"),
        _ => format!("{clean}_{stamp}"),
    }
}

/// Storage rooted at the configured upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root and all known subdirectories. Called at startup.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for subdir in [IMAGES_SUBDIR, INVOICES_SUBDIR, TEMP_SUBDIR] {
            tokio::fs::create_dir_all(self.root.join(subdir)).await?;
        }
        Ok(())
    }

    /// Write bytes under `subdir/filename` ("" for the root), returning the
    /// full path of the stored file.
    pub async fn save(
        &self,
        subdir: &str,
        filename: &str,
        bytes: &[u8],
    ) -> std::io::Result<PathBuf> {
        let dir = if subdir.is_empty() {
            self.root.clone()
        } else {
            self.root.join(subdir)
        };
        tokio::fs::create_dir_all(&dir).await?;
        let dest = dir.join(filename);
        tokio::fs::write(&dest, bytes).await?;
        Ok(dest)
    }

    /// Public URL for a stored file, rooted at the static `/uploads/` prefix.
    pub fn public_url(&self, base_url: &str, subdir: &str, filename: &str) -> String {
        format!("{base_url}/uploads/{subdir}/{filename}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(has_allowed_extension("foto.jpg"));
        assert!(has_allowed_extension("foto.JPEG"));
        assert!(has_allowed_extension("arte.png"));
        assert!(has_allowed_extension("nota.PDF"));
        assert!(!has_allowed_extension("video.mp4"));
        assert!(!has_allowed_extension("script.sh"));
        assert!(!has_allowed_extension("sem-extensao"));
    }

    #[test]
    fn sanitize_strips_paths_and_whitespace() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("meu arquivo.pdf"), "meu_arquivo.pdf");
        assert_eq!(sanitize_filename("C:\\temp\\nota fiscal.pdf"), "nota_fiscal.pdf");
        assert_eq!(sanitize_filename("toy*art?.png"), "toyart.png");
    }

    #[test]
    fn timestamped_name_keeps_extension() {
        let name = timestamped_name("ordem final.pdf");
        assert!(name.starts_with("ordem_final_"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn timestamped_name_without_extension() {
        let name = timestamped_name("ordem");
        assert!(name.starts_with("ordem_"));
        assert!(!name.contains('.'));
    }
}
