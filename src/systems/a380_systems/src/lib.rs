pub mod fac;
