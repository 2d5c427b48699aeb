//! ONNX Runtime super-resolution backend.

use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use tracing::{debug, info};

use crate::error::{Result, UpscaleError};
use crate::raster::{Image, ScaleFactor};
use crate::resample::Resampler;

use super::family::{ModelFamily, TensorLayout};
use super::model::{resolve_model, ModelSelection};
use super::tensor::{from_tensor, replace_luma, rgb_to_ycbcr, to_tensor, ycbcr_to_rgb};
use super::{SuperResolution, SuperResolutionFactory};

fn backend_error(err: ort::Error) -> UpscaleError {
    UpscaleError::BackendFailure(err.to_string())
}

/// Loads ONNX super-resolution models with ONNX Runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct OnnxFactory;

impl SuperResolutionFactory for OnnxFactory {
    fn name(&self) -> &str {
        "ONNX Runtime"
    }

    fn configure(
        &self,
        selection: &ModelSelection,
        scale: ScaleFactor,
        cwd: &Path,
    ) -> Result<Box<dyn SuperResolution>> {
        let model = resolve_model(selection, scale, cwd)?;
        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(&model.path))
            .map_err(backend_error)?;
        info!(model = %model.file_name(), family = %model.family, "Loaded ONNX model");

        Ok(Box::new(OnnxSuperResolution {
            name: model.file_name(),
            family: model.family,
            scale,
            session,
        }))
    }
}

struct OnnxSuperResolution {
    name: String,
    family: ModelFamily,
    scale: ScaleFactor,
    session: Session,
}

impl OnnxSuperResolution {
    fn infer(&mut self, plane: &Image, layout: TensorLayout) -> Result<Image> {
        let (shape, values) = to_tensor(plane, layout)?;
        let input = Tensor::from_array((shape, values)).map_err(backend_error)?;
        let outputs = self
            .session
            .run(ort::inputs![input])
            .map_err(backend_error)?;
        let (out_shape, out_values) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(backend_error)?;
        let dims: Vec<usize> = out_shape.iter().map(|&d| d.max(0) as usize).collect();
        debug!(?dims, "Model output");
        from_tensor(&dims, out_values, layout)
    }
}

impl SuperResolution for OnnxSuperResolution {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> ModelFamily {
        self.family
    }

    fn upscale(&mut self, color: &Image, resampler: &dyn Resampler) -> Result<Image> {
        match self.family.tensor_layout() {
            TensorLayout::Rgb255 => self.infer(color, TensorLayout::Rgb255),
            TensorLayout::Luma01 => {
                let ycc = rgb_to_ycbcr(color);
                let luma = ycc.select_channels(0..1);
                let luma_up = self.infer(&luma, TensorLayout::Luma01)?;
                let chroma_up = resampler.resample(&ycc, self.scale)?;
                Ok(ycbcr_to_rgb(&replace_luma(&chroma_up, &luma_up)?))
            }
        }
    }
}
