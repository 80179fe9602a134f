// Comment toxicity screening behind one trait, with two backends.
//
// TextClassifier is the interface. LexicalScorer scores text against a
// built-in polarity lexicon; MlClassifier runs a shared ONNX toxicity model.
// Which one the moderation panel gets is decided by configuration.

pub mod download;
pub mod lexical;
pub mod lexicon;
pub mod ml;
pub mod model;
pub mod onnx;
pub mod traits;
