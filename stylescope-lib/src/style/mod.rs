pub mod computed;
pub mod css_matcher;
pub mod css_parse;
pub mod cssom;
pub mod specificity;
