pub(crate) mod blur;
pub(crate) mod canvas;
pub(crate) mod composite;
pub(crate) mod compositor;
pub(crate) mod entry;
pub(crate) mod page;
pub(crate) mod paint;
pub(crate) mod section;
pub(crate) mod surface;
pub(crate) mod text;
