//! Thin wrapper around an ONNX Runtime session with one image input.

use crate::{
    utils::image_conversion::TensorLayout,
    Error, Result,
};
use ndarray::{Array4, CowArray};
use ort::{Environment, GraphOptimizationLevel, LoggingLevel, Session, SessionBuilder, Value};
use std::path::Path;
use std::sync::Arc;

/// An ONNX model taking a single image tensor
pub struct OnnxModel {
    session: Session,
    input_layout: TensorLayout,
    input_size: Option<(u32, u32)>,
}

impl OnnxModel {
    /// Load a model from file
    ///
    /// # Errors
    ///
    /// Returns an error if the ONNX runtime environment cannot be created,
    /// the model cannot be loaded, or it declares no inputs or outputs.
    pub fn load<P: AsRef<Path>>(name: &str, model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(Error::ModelError(format!("Model file not found: {}", model_path.display())));
        }
        log::info!("Loading {} model from {}", name, model_path.display());

        let environment = Arc::new(
            Environment::builder()
                .with_name(name)
                .with_log_level(LoggingLevel::Warning)
                .build()?,
        );

        let session = SessionBuilder::new(&environment)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| Error::ModelInputError(format!("{name} model has no inputs")))?;
        if session.outputs.is_empty() {
            return Err(Error::ModelOutputError(format!("{name} model has no outputs")));
        }

        let input_layout = TensorLayout::from_dimensions(&input.dimensions);
        let input_size = input_layout.spatial_size(&input.dimensions);
        log::debug!(
            "{} model input '{}' {:?}, layout {:?}",
            name,
            input.name,
            input.dimensions,
            input_layout
        );

        Ok(Self {
            session,
            input_layout,
            input_size,
        })
    }

    /// Layout the model expects for its input tensor
    #[must_use]
    pub fn input_layout(&self) -> TensorLayout {
        self.input_layout
    }

    /// Square input side declared by the model, or `default` if dynamic
    #[must_use]
    #[allow(clippy::cast_possible_wrap)] // Model input sizes are small
    pub fn input_side_or(&self, default: i32) -> i32 {
        match self.input_size {
            Some((h, w)) if h == w && h > 0 => h as i32,
            _ => default,
        }
    }

    /// Run inference and return every output flattened to `f32`
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails or an output is not an `f32`
    /// tensor.
    pub fn run(&self, input: Array4<f32>) -> Result<Vec<Vec<f32>>> {
        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;

        outputs
            .iter()
            .map(|output| -> Result<Vec<f32>> {
                let tensor = output.try_extract::<f32>()?;
                let view = tensor.view();
                Ok(view.iter().copied().collect())
            })
            .collect()
    }
}
