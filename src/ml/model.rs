use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};

use crate::domain::error::{PipelineError, PipelineResult};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally. Do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct ClassifierConfig {
    /// Width of the hashed fingerprint
    #[config(default = 2048)]
    pub fingerprint_dim: usize,

    #[config(default = 128)]
    pub hidden_dim: usize,

    #[config(default = 0.2)]
    pub dropout: f64,

    #[config(default = 30)]
    pub epochs: usize,

    #[config(default = 32)]
    pub batch_size: usize,

    #[config(default = 1e-3)]
    pub lr: f64,

    /// Seeds weight init and the per-epoch batch shuffle
    #[config(default = 42)]
    pub seed: u64,
}

impl ClassifierConfig {
    /// Rejects hyperparameters the layers or the optimiser cannot
    /// work with. Called before any weights are built.
    pub fn validate(&self) -> PipelineResult<()> {
        let bad = |msg: String| Err(PipelineError::InvalidConfig(msg));

        if self.fingerprint_dim == 0 {
            return bad("fingerprint dimension must be positive".to_string());
        }
        if self.hidden_dim == 0 {
            return bad("hidden dimension must be positive".to_string());
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return bad(format!("dropout {} must be in [0, 1)", self.dropout));
        }
        if self.epochs == 0 || self.batch_size == 0 {
            return bad(format!(
                "epochs ({}) and batch size ({}) must be positive",
                self.epochs, self.batch_size
            ));
        }
        if !(self.lr > 0.0 && self.lr.is_finite()) {
            return bad(format!("learning rate {} must be positive", self.lr));
        }
        Ok(())
    }

    pub fn init_model<B: Backend>(&self, device: &B::Device) -> FingerprintMlp<B> {
        FingerprintMlp {
            input:   LinearConfig::new(self.fingerprint_dim, self.hidden_dim).init(device),
            hidden:  LinearConfig::new(self.hidden_dim, self.hidden_dim).init(device),
            output:  LinearConfig::new(self.hidden_dim, 1).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct FingerprintMlp<B: Backend> {
    pub input:   Linear<B>,
    pub hidden:  Linear<B>,
    pub output:  Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> FingerprintMlp<B> {
    /// features: [batch, fingerprint_dim] → logits: [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.dropout.forward(relu(self.input.forward(features)));
        let x = self.dropout.forward(relu(self.hidden.forward(x)));
        self.output.forward(x)
    }

    /// Mean binary cross-entropy of the logits against 0/1 targets.
    pub fn forward_loss(&self, features: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
        bce_with_logits(self.forward(features), targets)
    }
}

/// Numerically stable BCE on logits:
/// max(x, 0) - x·y + ln(1 + e^(-|x|))
pub fn bce_with_logits<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    let positive_part = logits.clone().clamp_min(0.0);
    let log_term = logits.clone().abs().neg().exp().add_scalar(1.0).log();
    (positive_part - logits * targets + log_term).mean()
}
