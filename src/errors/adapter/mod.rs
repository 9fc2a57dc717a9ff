pub mod embedded_io;
pub mod postcard;
