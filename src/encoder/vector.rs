/// Encoded features in training-schema order, tagged with the model version
/// whose encoder table produced them.
///
/// The values cannot be changed after construction; the model and the
/// attribution engine rely on the order and length being exactly what the
/// encoder emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    model_version: String,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(model_version: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            model_version: model_version.into(),
            values,
        }
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::ops::Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}
