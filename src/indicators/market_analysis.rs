//! Volume analysis
//!
//! Provides functions to compare the latest volume against its recent average

use serde::{Deserialize, Serialize};

/// Volume above this multiple of the average confirms a move
pub const HIGH_VOLUME_MULTIPLE: f64 = 1.5;
/// Volume below this multiple of the average weakens a move
pub const LOW_VOLUME_MULTIPLE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeConfirmation {
    High,   // Current volume > 1.5x average
    Low,    // Current volume < 0.5x average
    Normal, // In between
}

/// Calculate average volume over the trailing `period` values
pub fn calculate_average_volume(volumes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || volumes.len() < period {
        return None;
    }

    let recent = &volumes[volumes.len() - period..];
    Some(recent.iter().sum::<f64>() / period as f64)
}

/// Latest volume divided by the average of the trailing `period` values
/// (which includes the latest one)
///
/// Returns 1.0 when the window has no volume at all, None on short input.
pub fn volume_ratio(volumes: &[f64], period: usize) -> Option<f64> {
    let avg_volume = calculate_average_volume(volumes, period)?;
    let current_volume = *volumes.last()?;

    if avg_volume > 0.0 {
        Some(current_volume / avg_volume)
    } else {
        Some(1.0)
    }
}

/// Classify the latest volume against the mean of `recent_volumes`
///
/// Returns None when there is nothing to compare against (empty or zero-volume window)
pub fn volume_confirmation(recent_volumes: &[f64]) -> Option<VolumeConfirmation> {
    let current_volume = *recent_volumes.last()?;
    let avg_volume = recent_volumes.iter().sum::<f64>() / recent_volumes.len() as f64;

    if avg_volume <= 0.0 {
        return None;
    }

    let confirmation = if current_volume > avg_volume * HIGH_VOLUME_MULTIPLE {
        VolumeConfirmation::High
    } else if current_volume < avg_volume * LOW_VOLUME_MULTIPLE {
        VolumeConfirmation::Low
    } else {
        VolumeConfirmation::Normal
    };

    Some(confirmation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_volume() {
        let volumes = vec![1000.0, 2000.0, 3000.0];
        let avg_vol = calculate_average_volume(&volumes, 3).unwrap();

        assert_eq!(avg_vol, 2000.0);
        assert!(calculate_average_volume(&volumes, 4).is_none());
    }

    #[test]
    fn test_volume_ratio() {
        let mut volumes = vec![1000.0; 9];
        volumes.push(2000.0);

        // avg = 11000 / 10 = 1100
        let ratio = volume_ratio(&volumes, 10).unwrap();
        assert!((ratio - 2000.0 / 1100.0).abs() < 1e-12);
    }

    #[test]
    fn test_volume_ratio_zero_volume() {
        // Backfilled data without volume
        let volumes = vec![0.0; 10];
        assert_eq!(volume_ratio(&volumes, 10), Some(1.0));
    }

    #[test]
    fn test_volume_spike_confirmation() {
        // Normal volume followed by spike
        let mut volumes = vec![1000.0; 9];
        volumes.push(5000.0);

        // avg = 1400, 5000 > 2100
        assert_eq!(volume_confirmation(&volumes), Some(VolumeConfirmation::High));
    }

    #[test]
    fn test_volume_drought_confirmation() {
        let mut volumes = vec![1000.0; 9];
        volumes.push(100.0);

        assert_eq!(volume_confirmation(&volumes), Some(VolumeConfirmation::Low));
    }

    #[test]
    fn test_volume_normal_and_missing() {
        assert_eq!(
            volume_confirmation(&[1000.0; 10]),
            Some(VolumeConfirmation::Normal)
        );
        assert_eq!(volume_confirmation(&[0.0; 10]), None);
        assert_eq!(volume_confirmation(&[]), None);
    }
}
