use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::CrossEntropyLossConfig,
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig, PaddingConfig2d,
    },
    prelude::*,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally; do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct CnnConfig {
    #[config(default = 3)]
    pub in_channels:    usize,
    #[config(default = 32)]
    pub conv1_channels: usize,
    #[config(default = 64)]
    pub conv2_channels: usize,
    #[config(default = 3)]
    pub kernel_size:    usize,
    #[config(default = 1)]
    pub stride:         usize,
    #[config(default = 1)]
    pub padding:        usize,
    #[config(default = 2)]
    pub pool_size:      usize,
    /// Side length of the square input image
    #[config(default = 28)]
    pub input_size:     usize,
    #[config(default = 128)]
    pub hidden_size:    usize,
    #[config(default = 10)]
    pub num_classes:    usize,
}

impl CnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Cnn<B> {
        let conv = |c_in: usize, c_out: usize| {
            Conv2dConfig::new([c_in, c_out], [self.kernel_size, self.kernel_size])
                .with_stride([self.stride, self.stride])
                .with_padding(PaddingConfig2d::Explicit(self.padding, self.padding))
                .init(device)
        };
        let pool = || {
            MaxPool2dConfig::new([self.pool_size, self.pool_size])
                .with_strides([self.pool_size, self.pool_size])
                .init()
        };

        Cnn {
            conv1: conv(self.in_channels, self.conv1_channels),
            pool1: pool(),
            conv2: conv(self.conv1_channels, self.conv2_channels),
            pool2: pool(),
            fc1:   LinearConfig::new(self.flat_features(), self.hidden_size).init(device),
            fc2:   LinearConfig::new(self.hidden_size, self.num_classes).init(device),
        }
    }

    /// Width of the flattened feature map fed to the first linear layer.
    /// Two pooling stages shrink each side by pool_size²: 28 → 7.
    pub fn flat_features(&self) -> usize {
        let side = self.input_size / (self.pool_size * self.pool_size);
        self.conv2_channels * side * side
    }
}

/// Two conv/pool stages, flatten, two linear layers.
///
/// The stack has no activation between layers, so apart from the max
/// pooling the whole network is affine in its input.
#[derive(Module, Debug)]
pub struct Cnn<B: Backend> {
    pub conv1: Conv2d<B>,
    pub pool1: MaxPool2d,
    pub conv2: Conv2d<B>,
    pub pool2: MaxPool2d,
    pub fc1:   Linear<B>,
    pub fc2:   Linear<B>,
}

impl<B: Backend> Cnn<B> {
    /// images: [batch, 3, 28, 28] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.pool1.forward(self.conv1.forward(images));
        let x = self.pool2.forward(self.conv2.forward(x));
        let x = x.flatten::<2>(1, 3);
        self.fc2.forward(self.fc1.forward(x))
    }

    /// Cross-entropy between the logits and the class targets.
    pub fn forward_loss(
        &self,
        images:  Tensor<B, 4>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images);
        let ce     = CrossEntropyLossConfig::new().init(&logits.device());
        let loss   = ce.forward(logits.clone(), targets);
        (loss, logits)
    }
}
