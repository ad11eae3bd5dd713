use super::com_interface;
use super::vtbl::IUnknownVtbl;

com_interface! {
    /// The root interface; any COM object can be held as an `IUnknown`.
    IUnknown, IUnknownVtbl, "00000000-0000-0000-C000-000000000046"
}

impl IUnknown {
    /// Upcasts any interface to `IUnknown` by taking another reference.
    pub fn from_interface<T: super::ComInterface>(obj: &T) -> Self {
        Self(obj.com_ptr().clone())
    }
}
