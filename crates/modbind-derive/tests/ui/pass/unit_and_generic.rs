use modbind_core::modules::Module;
use modbind_core::{Bindable, Binder};
use modbind_derive::Module;

#[derive(Module)]
struct Marker;

#[derive(Default, Module)]
struct Wrapper<T: Bindable + Default> {
    #[bind(provide = "wrapped")]
    value: T,
    #[bind(inject = "wrapped")]
    copy: T,
}

fn main() {
    let mut marker = Marker;
    assert!(marker.fields().is_empty());

    let mut wrapper = Wrapper::<u8> {
        value: 3,
        copy: 0,
    };
    Binder::new().bind(&mut [&mut marker, &mut wrapper]).unwrap();
    assert_eq!(wrapper.copy, 3);
}
