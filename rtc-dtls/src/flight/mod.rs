pub mod flight0;
