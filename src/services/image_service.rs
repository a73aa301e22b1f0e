//! Validación de imágenes
//! 
//! Valida assets binarios contra la política de tamaño y dimensiones, desde
//! un buffer en memoria o desde una URL remota. El orden de los checks sobre
//! un buffer importa: primero el tamaño en bytes (el check más barato, falla
//! sin intentar decodificar), después la decodificación de dimensiones desde
//! la cabecera, después los mínimos de ancho/alto. El aspect ratio fuera de
//! banda sólo produce un warning: el feed de sindicación prefiere 4:3 o 3:2.

use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;
use thiserror::Error;

use crate::dto::listing_dto::ImagePayload;

/// Política de validación de imágenes
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    pub min_width: u32,
    pub min_height: u32,
    pub max_bytes: usize,
    pub fetch_timeout: Duration,
    pub aspect_ratio_min: f64,
    pub aspect_ratio_max: f64,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            min_width: 800,
            min_height: 600,
            max_bytes: 5 * 1024 * 1024,
            fetch_timeout: Duration::from_secs(10),
            aspect_ratio_min: 1.2,
            aspect_ratio_max: 1.8,
        }
    }
}

/// Errores fatales de validación de imagen
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image is too large: {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("image is unreadable: {0}")]
    Unreadable(String),

    #[error("image is too small: {width}x{height} is below the {min_width}x{min_height} minimum")]
    TooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    #[error("image download failed: {0}")]
    Download(String),

    #[error("invalid image payload: {0}")]
    InvalidPayload(String),
}

/// Resultado de la validación de una imagen individual
#[derive(Debug, Clone)]
pub struct ImageCheck {
    pub width: u32,
    pub height: u32,
    /// Extensión derivada del formato detectado ("jpg", "png", ...)
    pub extension: String,
    pub warnings: Vec<String>,
}

/// Validar un buffer de imagen contra la política
pub fn validate_buffer(bytes: &[u8], policy: &ImagePolicy) -> Result<ImageCheck, ImageError> {
    if bytes.len() > policy.max_bytes {
        return Err(ImageError::TooLarge {
            size: bytes.len(),
            max: policy.max_bytes,
        });
    }

    let reader = image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageError::Unreadable(e.to_string()))?;

    let format = reader
        .format()
        .ok_or_else(|| ImageError::Unreadable("unsupported or corrupt image format".to_string()))?;
    let extension = format
        .extensions_str()
        .first()
        .copied()
        .unwrap_or("bin")
        .to_string();

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ImageError::Unreadable(e.to_string()))?;

    if width < policy.min_width || height < policy.min_height {
        return Err(ImageError::TooSmall {
            width,
            height,
            min_width: policy.min_width,
            min_height: policy.min_height,
        });
    }

    let mut warnings = Vec::new();
    let ratio = width as f64 / height as f64;
    if ratio < policy.aspect_ratio_min || ratio > policy.aspect_ratio_max {
        warnings.push(format!(
            "Unusual aspect ratio {:.2} ({}x{}); the syndication feed prefers 4:3 or 3:2 imagery",
            ratio, width, height
        ));
    }

    Ok(ImageCheck {
        width,
        height,
        extension,
        warnings,
    })
}

pub struct ImageService {
    client: reqwest::Client,
    policy: ImagePolicy,
}

impl ImageService {
    pub fn new(client: reqwest::Client, policy: ImagePolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &ImagePolicy {
        &self.policy
    }

    /// Resolver un payload a sus bytes: base64 inline o descarga remota
    pub async fn resolve_payload(&self, payload: &ImagePayload) -> Result<Bytes, ImageError> {
        use base64::Engine as _;

        match (&payload.data, &payload.url) {
            (Some(data), _) => {
                let decoded = base64::engine::general_purpose::STANDARD
                    .decode(data.trim())
                    .map_err(|e| ImageError::InvalidPayload(format!("invalid base64 data: {}", e)))?;
                Ok(Bytes::from(decoded))
            }
            (None, Some(url)) => self.fetch_remote(url).await,
            (None, None) => Err(ImageError::InvalidPayload(
                "image payload must provide either inline data or a url".to_string(),
            )),
        }
    }

    /// Validar un payload completo: resolver bytes y pasar por el path de buffer
    pub async fn validate_payload(
        &self,
        payload: &ImagePayload,
    ) -> Result<(Bytes, ImageCheck), ImageError> {
        let bytes = self.resolve_payload(payload).await?;
        let check = validate_buffer(&bytes, &self.policy)?;
        Ok((bytes, check))
    }

    /// Descargar una imagen remota con timeout y tamaño de transferencia acotados
    async fn fetch_remote(&self, url: &str) -> Result<Bytes, ImageError> {
        let response = self
            .client
            .get(url)
            .timeout(self.policy.fetch_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ImageError::Download(format!("timed out fetching {}", url))
                } else {
                    ImageError::Download(format!("transport error fetching {}: {}", url, e))
                }
            })?;

        match response.status().as_u16() {
            200..=299 => {}
            404 => return Err(ImageError::Download(format!("image not found at {}", url))),
            403 => return Err(ImageError::Download(format!("access forbidden for {}", url))),
            code => {
                return Err(ImageError::Download(format!(
                    "unexpected status {} fetching {}",
                    code, url
                )))
            }
        }

        if let Some(len) = response.content_length() {
            if len as usize > self.policy.max_bytes {
                return Err(ImageError::TooLarge {
                    size: len as usize,
                    max: self.policy.max_bytes,
                });
            }
        }

        // La transferencia se corta en cuanto supera el máximo, sin esperar
        // al final del body
        let mut buffer = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| ImageError::Download(format!("error reading body of {}: {}", url, e)))?;
            if buffer.len() + chunk.len() > self.policy.max_bytes {
                return Err(ImageError::TooLarge {
                    size: buffer.len() + chunk.len(),
                    max: self.policy.max_bytes,
                });
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(Bytes::from(buffer))
    }

    /// Validar un lote de assets con nombre; devuelve un resultado por nombre
    pub async fn validate_batch(
        &self,
        assets: &[(String, ImagePayload)],
    ) -> HashMap<String, Result<ImageCheck, ImageError>> {
        let mut results = HashMap::new();
        for (name, payload) in assets {
            let result = self.validate_payload(payload).await.map(|(_, check)| check);
            results.insert(name.clone(), result);
        }
        results
    }
}

/// Guardia de mínimo de imágenes: al menos `minimum` assets del lote deben
/// ser individualmente válidos para dejar avanzar la submission
pub fn has_minimum_valid(
    results: &HashMap<String, Result<ImageCheck, ImageError>>,
    minimum: usize,
) -> bool {
    results.values().filter(|r| r.is_ok()).count() >= minimum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageOutputFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_exact_minimum_dimensions_pass() {
        let check = validate_buffer(&png_bytes(800, 600), &ImagePolicy::default()).unwrap();
        assert_eq!((check.width, check.height), (800, 600));
        assert_eq!(check.extension, "png");
    }

    #[test]
    fn test_below_minimum_width_fails_too_small() {
        let result = validate_buffer(&png_bytes(799, 600), &ImagePolicy::default());
        assert!(matches!(result, Err(ImageError::TooSmall { width: 799, .. })));
    }

    #[test]
    fn test_oversized_buffer_fails_before_decoding() {
        // Un buffer de ceros no es decodificable: si el error es TooLarge es
        // porque el check de tamaño corrió antes que el intento de decode
        let policy = ImagePolicy::default();
        let oversized = vec![0u8; policy.max_bytes + 1];
        let result = validate_buffer(&oversized, &policy);
        assert!(matches!(result, Err(ImageError::TooLarge { .. })));
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let result = validate_buffer(b"definitely not an image", &ImagePolicy::default());
        assert!(matches!(result, Err(ImageError::Unreadable(_))));
    }

    #[test]
    fn test_aspect_ratio_outside_band_warns() {
        // 2000x1000 -> ratio 2.0, fuera de la banda 1.2-1.8
        let check = validate_buffer(&png_bytes(2000, 1000), &ImagePolicy::default()).unwrap();
        assert_eq!(check.warnings.len(), 1);
        assert!(check.warnings[0].contains("aspect ratio"));
    }

    #[test]
    fn test_typical_listing_photo_has_no_warnings() {
        // 1000x800 -> ratio 1.25, dentro de banda
        let check = validate_buffer(&png_bytes(1000, 800), &ImagePolicy::default()).unwrap();
        assert!(check.warnings.is_empty());
    }

    #[test]
    fn test_minimum_valid_guard() {
        let mut results: HashMap<String, Result<ImageCheck, ImageError>> = HashMap::new();
        results.insert("front".to_string(), Err(ImageError::Unreadable("x".to_string())));
        assert!(!has_minimum_valid(&results, 1));

        results.insert(
            "rear".to_string(),
            validate_buffer(&png_bytes(1024, 768), &ImagePolicy::default()),
        );
        assert!(has_minimum_valid(&results, 1));
        assert!(!has_minimum_valid(&results, 2));
    }
}
