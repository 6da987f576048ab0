//! Loading a picked cover image
//!
//! Picking a cover is asynchronous: the bytes arrive some time after the user
//! chose a file, and they may have picked something else by then. Every pick
//! gets a [`PickerToken`]; a load whose token is no longer current resolves to
//! [`CoverLoad::Stale`] and must not be applied.

use std::fmt::Display;
use std::future::Future;
use tokio::sync::watch;

/// Identifies one cover selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerToken(u64);

/// Outcome of loading a picked cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverLoad {
    /// Decoded successfully; holds the raw bytes
    Loaded(Vec<u8>),

    /// Could not be read or decoded; the pick has no effect
    Failed,

    /// A newer selection replaced this one
    Stale,
}

/// Tracks the active cover selection
pub struct CoverPicker {
    active: watch::Sender<u64>,
}

impl Default for CoverPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverPicker {
    pub fn new() -> Self {
        let (active, _) = watch::channel(0);
        Self { active }
    }

    /// Begin a new selection, superseding any load in flight
    pub fn select(&self) -> PickerToken {
        let mut token = 0;
        self.active.send_modify(|current| {
            *current += 1;
            token = *current;
        });
        PickerToken(token)
    }

    pub fn is_current(&self, token: PickerToken) -> bool {
        *self.active.borrow() == token.0
    }

    /// Wait for `source` and check it is a decodable image.
    ///
    /// Resolves early with [`CoverLoad::Stale`] as soon as another selection
    /// is made; `source` is dropped at that point.
    pub async fn load<F, E>(&self, token: PickerToken, source: F) -> CoverLoad
    where
        F: Future<Output = Result<Vec<u8>, E>>,
        E: Display,
    {
        let mut changes = self.active.subscribe();
        if !self.is_current(token) {
            return CoverLoad::Stale;
        }

        let fetched = tokio::select! {
            fetched = source => fetched,
            _ = superseded(&mut changes, token) => return CoverLoad::Stale,
        };

        let bytes = match fetched {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read cover image: {}", e);
                return self.settle(token, CoverLoad::Failed);
            }
        };

        // Decoding is CPU-bound
        let decoded = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&bytes).map(|img| (bytes, img.width(), img.height()))
        })
        .await;

        let outcome = match decoded {
            Ok(Ok((bytes, width, height))) => {
                tracing::debug!("Loaded {}x{} cover ({} bytes)", width, height, bytes.len());
                CoverLoad::Loaded(bytes)
            }
            Ok(Err(e)) => {
                tracing::warn!("Cover image could not be decoded: {}", e);
                CoverLoad::Failed
            }
            Err(e) => {
                tracing::warn!("Cover decode task failed: {}", e);
                CoverLoad::Failed
            }
        };
        self.settle(token, outcome)
    }

    /// Drop the outcome if the selection changed meanwhile
    fn settle(&self, token: PickerToken, outcome: CoverLoad) -> CoverLoad {
        if self.is_current(token) {
            outcome
        } else {
            CoverLoad::Stale
        }
    }
}

/// Completes once the active selection is no longer `token`
async fn superseded(changes: &mut watch::Receiver<u64>, token: PickerToken) {
    loop {
        if *changes.borrow_and_update() != token.0 {
            return;
        }
        if changes.changed().await.is_err() {
            // picker dropped; nothing can supersede us now
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 3));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn test_load_valid_image() {
        let picker = CoverPicker::new();
        let token = picker.select();
        let bytes = png_bytes();
        let outcome = picker
            .load(token, async { Ok::<_, std::io::Error>(bytes.clone()) })
            .await;
        assert_eq!(outcome, CoverLoad::Loaded(bytes));
    }

    #[tokio::test]
    async fn test_undecodable_image_fails() {
        let picker = CoverPicker::new();
        let token = picker.select();
        let outcome = picker
            .load(token, async { Ok::<_, std::io::Error>(b"not an image".to_vec()) })
            .await;
        assert_eq!(outcome, CoverLoad::Failed);
    }

    #[tokio::test]
    async fn test_read_failure_fails() {
        let picker = CoverPicker::new();
        let token = picker.select();
        let outcome = picker
            .load(token, async { Err::<Vec<u8>, _>("disk on fire") })
            .await;
        assert_eq!(outcome, CoverLoad::Failed);
    }

    #[tokio::test]
    async fn test_old_token_is_stale() {
        let picker = CoverPicker::new();
        let first = picker.select();
        let second = picker.select();
        assert!(!picker.is_current(first));
        assert!(picker.is_current(second));

        let outcome = picker
            .load(first, async { Ok::<_, std::io::Error>(png_bytes()) })
            .await;
        assert_eq!(outcome, CoverLoad::Stale);
    }

    #[tokio::test]
    async fn test_reselect_during_load_cancels() {
        let picker = CoverPicker::new();
        let token = picker.select();

        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, std::io::Error>(png_bytes())
        };
        let reselect = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            picker.select()
        };

        let (outcome, newer) = tokio::join!(picker.load(token, slow), reselect);
        assert_eq!(outcome, CoverLoad::Stale);
        assert!(picker.is_current(newer));
    }
}
