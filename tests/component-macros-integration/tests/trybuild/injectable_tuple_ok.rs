use component_macros::Injectable;
use di_abstractions::{Arguments, Injectable};
use std::sync::Arc;

#[derive(Injectable)]
struct Wrapper(#[inject("Inner")] Option<Arc<String>>, u8);

#[derive(Injectable)]
struct Marker;

fn main() {
    let wrapper = Wrapper::construct(&Arguments::new("Wrapper", vec![None, None])).unwrap();
    assert!(wrapper.0.is_none());
    assert_eq!(wrapper.1, 0);
    assert!(Marker::dependencies().is_empty());
}
