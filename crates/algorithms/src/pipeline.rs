//! Claim assessment pipeline
//!
//! Images are analysed independently (fanned out over the rayon pool when
//! enabled) and gathered into claim-level figures. The verifiers, fraud
//! composition and decision then run in sequence, each stage consuming the
//! previous one's output.
//!
//! Only [`Error::NoValidImages`] aborts an assessment. Unreadable images are
//! skipped, missing metadata and failed weather lookups degrade to neutral
//! or synthetic inputs.

use crate::area::{damaged_area_range, estimate_area, m2_to_acres, ImageFootprint};
use crate::decision::{decide, payout, ClaimDecision};
use crate::fraud::{compose_fraud_risk, detect_metadata_tampering, FraudInputs};
use crate::geolocation::verify_geolocation;
use crate::maybe_rayon::*;
use crate::report::{
    assessment_id, AreaInfo, AssessmentResult, DamageRange, ImageAnalysis, OverallAssessment,
    PayoutCalculation, VerificationResults,
};
use crate::timestamps::verify_timestamps;
use crate::vegetation::{classifier_for, summarize_damage, DamageClassifier};
use crate::weather::{verify_weather, WeatherReport};
use agrisure_core::model::{
    round_to, CaptureTimestamp, Coordinate, DamageIndexResult, ImageMetadata, WeatherSnapshot,
};
use agrisure_core::source::{ImageDecoder, MetadataExtractor, SyntheticWeather, WeatherProvider};
use agrisure_core::{AssessmentConfig, Error, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One claim as submitted by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRequest {
    pub image_paths: Vec<PathBuf>,
    /// Known field size; overrides every area estimate when positive
    pub field_size_m2: Option<f64>,
    /// Fallback location for the weather lookup
    pub user_coordinate: Option<Coordinate>,
    pub sum_insured: f64,
    /// Submission time, used for timestamp checks and the assessment id
    pub claim_time: NaiveDateTime,
}

impl ClaimRequest {
    pub fn new(image_paths: Vec<PathBuf>, sum_insured: f64, claim_time: NaiveDateTime) -> Self {
        Self {
            image_paths,
            field_size_m2: None,
            user_coordinate: None,
            sum_insured,
            claim_time,
        }
    }
}

/// Everything extracted from one readable image.
#[derive(Debug, Clone)]
struct ProcessedImage {
    filename: String,
    analysis: DamageIndexResult,
    shape: (usize, usize),
    metadata: ImageMetadata,
}

/// Runs assessments with a fixed configuration and set of collaborators.
///
/// Holds no per-claim state, so one assessor can serve many claims.
pub struct ClaimAssessor {
    config: AssessmentConfig,
    classifier: Box<dyn DamageClassifier>,
    decoder: Box<dyn ImageDecoder>,
    metadata: Box<dyn MetadataExtractor>,
    weather: Box<dyn WeatherProvider>,
}

impl ClaimAssessor {
    /// Build an assessor. Weather defaults to the synthetic provider until
    /// [`with_weather`](Self::with_weather) supplies a live one.
    pub fn new(
        config: AssessmentConfig,
        decoder: Box<dyn ImageDecoder>,
        metadata: Box<dyn MetadataExtractor>,
    ) -> Result<Self> {
        config.validate()?;
        let classifier = classifier_for(&config.classifier, &config.vegetation);
        Ok(Self {
            config,
            classifier,
            decoder,
            metadata,
            weather: Box::new(SyntheticWeather),
        })
    }

    pub fn with_weather(mut self, weather: Box<dyn WeatherProvider>) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_classifier(mut self, classifier: Box<dyn DamageClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Assess one claim.
    pub fn assess(&self, request: &ClaimRequest) -> Result<AssessmentResult> {
        let attempted = request.image_paths.len();
        info!(
            "Assessing claim with {} images ({} classifier)",
            attempted,
            self.classifier.name()
        );

        let images = self.process_images(&request.image_paths);
        if images.is_empty() {
            return Err(Error::NoValidImages { attempted });
        }
        info!("Processed {}/{} images", images.len(), attempted);

        let analyses: Vec<DamageIndexResult> = images.iter().map(|i| i.analysis).collect();
        let summary = summarize_damage(&analyses).ok_or(Error::NoValidImages { attempted })?;

        let coords: Vec<Coordinate> = images.iter().filter_map(|i| i.metadata.coordinate).collect();
        let geolocation = verify_geolocation(&coords, &self.config.geolocation);
        info!(
            "Geolocation: {} ({:.2}) from {} coordinates",
            geolocation.status(),
            geolocation.score(),
            coords.len()
        );

        let weather = match geolocation.center.or(request.user_coordinate) {
            Some(target) => verify_weather(&self.fetch_weather(target), summary.dominant_type),
            None => WeatherReport::skipped("No coordinates"),
        };
        info!(
            "Weather: {} ({:.2})",
            weather.status(),
            weather.confidence_score()
        );

        let timestamps: Vec<CaptureTimestamp> = images
            .iter()
            .map(|i| CaptureTimestamp::new(i.filename.clone(), capture_time(i)))
            .collect();
        let exif = verify_timestamps(&timestamps, request.claim_time, &self.config.timestamps);

        let tampering = detect_metadata_tampering(
            images
                .iter()
                .map(|i| (i.filename.as_str(), i.metadata.software.as_deref())),
            &self.config.fraud,
        );

        let fraud = compose_fraud_risk(
            &FraudInputs {
                geolocation: geolocation.score(),
                weather: weather.confidence_score(),
                exif: exif.score(),
                tampering: tampering.score,
            },
            &self.config.fraud,
        );

        let decision = decide(
            geolocation.score(),
            weather.confidence_score(),
            &fraud,
            &self.config.decision,
        );

        let footprints: Vec<ImageFootprint> = images
            .iter()
            .map(|i| ImageFootprint {
                altitude_m: i.metadata.altitude_m,
                dimensions: i.metadata.dimensions,
            })
            .collect();
        let area = estimate_area(
            request.field_size_m2,
            geolocation.max_spread_km,
            &footprints,
            &self.config.area,
        );
        let damaged = damaged_area_range(
            area.total_area_m2,
            summary.mean,
            self.config.area.variance_factor,
        );

        let payout_amount = payout(decision.decision, summary.mean, request.sum_insured);

        Ok(AssessmentResult {
            assessment_id: assessment_id(request.claim_time),
            damage_type: summary.dominant_type.name(),
            damage_type_code: summary.dominant_type,
            damage_percentage: round_to(summary.mean, 1),
            damage_percentage_range: DamageRange {
                min: round_to(summary.min, 1),
                mean: round_to(summary.mean, 1),
                max: round_to(summary.max, 1),
            },
            damaged_area_m2: damaged.m2.mean,
            damaged_area: damaged,
            overall_assessment: OverallAssessment {
                final_decision: decision.decision,
                confidence_score: round_to(decision.verified_confidence, 2),
                risk_level: fraud.risk_level,
                manual_review_required: decision.decision == ClaimDecision::ManualReview,
                decision_reason: decision.reason,
            },
            verification_results: VerificationResults {
                geolocation,
                weather,
                fraud_risk: fraud,
                exif,
                tampering,
            },
            payout_calculation: PayoutCalculation {
                sum_insured: request.sum_insured,
                damage_percent: round_to(summary.mean, 1),
                payout_amount,
                currency: self.config.currency.clone(),
            },
            area_info: AreaInfo {
                total_field_area_m2: round_to(area.total_area_m2, 1),
                total_field_area_acres: round_to(m2_to_acres(area.total_area_m2), 4),
                estimation_method: area.method,
            },
            images: images
                .into_iter()
                .map(|i| ImageAnalysis {
                    filename: i.filename,
                    damage_type_name: i.analysis.damage_type_code.name(),
                    damage: i.analysis,
                    image_size: [i.shape.0, i.shape.1],
                })
                .collect(),
            images_processed: analyses.len(),
            images_attempted: attempted,
            timestamp: request.claim_time,
        })
    }

    /// Analyse every image, keeping input order and dropping failures.
    fn process_images(&self, paths: &[PathBuf]) -> Vec<ProcessedImage> {
        if self.config.parallel {
            paths.par_iter().filter_map(|p| self.process_image(p)).collect()
        } else {
            paths.iter().filter_map(|p| self.process_image(p)).collect()
        }
    }

    fn process_image(&self, path: &Path) -> Option<ProcessedImage> {
        let sample = match self.decoder.decode(path) {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Skipping image: {}", e);
                return None;
            }
        };

        let analysis = match self.classifier.classify(&sample) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                return None;
            }
        };

        let (rows, cols) = sample.shape();
        let mut metadata = self.metadata.extract(path);
        if metadata.dimensions.is_none() {
            metadata.dimensions = u32::try_from(cols).ok().zip(u32::try_from(rows).ok());
        }

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(
            "{}: {}% damaged, type {}",
            filename, analysis.damage_percentage, analysis.damage_type_code
        );

        Some(ProcessedImage {
            filename,
            analysis,
            shape: (rows, cols),
            metadata,
        })
    }

    fn fetch_weather(&self, at: Coordinate) -> WeatherSnapshot {
        match self.weather.fetch(at) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Weather lookup failed ({}), using synthetic data", e);
                WeatherSnapshot::synthetic(at)
            }
        }
    }
}

/// Parsed capture time; malformed values count as missing.
fn capture_time(image: &ProcessedImage) -> Option<NaiveDateTime> {
    match image.metadata.captured_at()? {
        Ok(t) => Some(t),
        Err(e) => {
            debug!("{}: {}", image.filename, e);
            None
        }
    }
}
