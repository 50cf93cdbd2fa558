use api::CartLine;
use dioxus::prelude::*;

#[component]
pub fn CartLineRow(line: CartLine) -> Element {
    let price = line.price.to_string_with_symbol();
    let total = line.line_total().to_string_with_symbol();
    rsx! {
        tr {
            td { "{line.name}" }
            td { "{price} / {line.unit}" }
            td { "{line.quantity}" }
            td { style: "text-align: right;", "{total}" }
        }
    }
}
