mod popup;

pub use popup::WebviewPopupLauncher;
