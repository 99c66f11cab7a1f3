//! Cross-seed stepper: edit parameters, preview, publish.

mod view;

pub(crate) use view::CrossSeedView;
