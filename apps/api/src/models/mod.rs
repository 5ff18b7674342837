pub mod worry;
