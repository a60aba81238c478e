use std::path::PathBuf;

/// Memory layout the model expects for its single image input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, 3, height, width]`
    Nchw,
    /// `[1, height, width, 3]`
    Nhwc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: PathBuf,
    /// (height, width)
    pub input_shape: (u32, u32),
    pub layout: TensorLayout,
    /// Class names, indexed by model output position.
    pub labels: Vec<String>,
}

impl ModelConfig {
    pub fn input_dims(&self) -> Vec<usize> {
        let (height, width) = (self.input_shape.0 as usize, self.input_shape.1 as usize);
        match self.layout {
            TensorLayout::Nchw => vec![1, 3, height, width],
            TensorLayout::Nhwc => vec![1, height, width, 3],
        }
    }
}
