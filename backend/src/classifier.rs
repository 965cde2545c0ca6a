use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tch::nn::ModuleT;
use tch::{CModule, Device, Kind, Tensor};

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Failed to load model from {}: {source}", path.display())]
    Load { path: PathBuf, source: tch::TchError },
    #[error("Failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Model execution failed: {0}")]
    Execution(#[from] tch::TchError),
}

/// One detection/classification result. The probability vector is optional;
/// a runtime can emit results without class scores.
#[derive(Debug, Clone)]
pub struct ClassifierOutput {
    pub probs: Option<Vec<f32>>,
}

/// Pretrained model collaborator. Loaded once at start-up and shared
/// read-only across requests; handlers receive it as a trait object so
/// tests can substitute a fake.
pub trait Classifier: Send + Sync {
    fn predict(&self, image_path: &Path) -> Result<Vec<ClassifierOutput>, ClassifierError>;
}

pub struct TorchClassifier {
    module: Mutex<CModule>,
    device: Device,
}

impl TorchClassifier {
    pub fn load(model_path: &Path) -> Result<Self, ClassifierError> {
        let device = Device::cuda_if_available();
        let module =
            CModule::load_on_device(model_path, device).map_err(|source| ClassifierError::Load {
                path: model_path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            module: Mutex::new(module),
            device,
        })
    }

    fn image_tensor(&self, path: &Path) -> Result<Tensor, ClassifierError> {
        let img = image::open(path)
            .map_err(|source| ClassifierError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        let (width, height) = img.dimensions();

        // HWC bytes -> CHW float in [0, 1], with a leading batch dimension.
        let tensor = Tensor::from_slice(img.as_raw())
            .view([height as i64, width as i64, 3])
            .permute([2, 0, 1])
            .to_kind(Kind::Float)
            / 255.0;
        Ok(tensor.unsqueeze(0).to_device(self.device))
    }
}

impl Classifier for TorchClassifier {
    fn predict(&self, image_path: &Path) -> Result<Vec<ClassifierOutput>, ClassifierError> {
        let input = self.image_tensor(image_path)?;
        let output = self.module.lock().unwrap().forward_t(&input, false);
        let output = output.softmax(-1, Kind::Float);
        let output_flat = output.to_kind(Kind::Float).view([-1]);
        let num_elements = output_flat.size()[0] as usize;
        let mut probs = vec![0.0f32; num_elements];
        output_flat.copy_data(&mut probs, num_elements);
        Ok(vec![ClassifierOutput { probs: Some(probs) }])
    }
}
