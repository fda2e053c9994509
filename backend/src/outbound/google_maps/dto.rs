//! DTOs for decoding Distance Matrix JSON replies.

use serde::Deserialize;

use crate::domain::ports::{MatrixElement, MatrixValue};

#[derive(Debug, Deserialize)]
pub(super) struct DistanceMatrixResponseDto {
    /// Top-level status, for example `OK` or `REQUEST_DENIED`.
    #[serde(default)]
    pub(super) status: Option<String>,
    #[serde(default)]
    pub(super) error_message: Option<String>,
    #[serde(default)]
    rows: Vec<RowDto>,
}

#[derive(Debug, Deserialize)]
struct RowDto {
    #[serde(default)]
    elements: Vec<ElementDto>,
}

#[derive(Debug, Deserialize)]
struct ElementDto {
    status: String,
    distance: Option<ValueDto>,
    duration: Option<ValueDto>,
}

#[derive(Debug, Deserialize)]
struct ValueDto {
    text: Option<String>,
    value: Option<i64>,
}

impl From<ValueDto> for MatrixValue {
    fn from(dto: ValueDto) -> Self {
        Self {
            text: dto.text,
            value: dto.value,
        }
    }
}

impl DistanceMatrixResponseDto {
    /// Take `rows[0].elements[0]`, if present.
    pub(super) fn into_first_element(self) -> Option<MatrixElement> {
        let element = self.rows.into_iter().next()?.elements.into_iter().next()?;
        Some(MatrixElement {
            status: element.status,
            distance: element.distance.map(MatrixValue::from),
            duration: element.duration.map(MatrixValue::from),
        })
    }
}
