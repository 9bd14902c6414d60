pub mod render2d;
