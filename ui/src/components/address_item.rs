use api::AddressId;
use api::DeliveryAddress;
use dioxus::prelude::*;

/// A selectable delivery address.
#[component]
pub fn AddressItem(
    address: DeliveryAddress,
    selected: bool,
    on_select: EventHandler<AddressId>,
) -> Element {
    let id = address.address_id;
    rsx! {
        label {
            class: if selected { "address-item selected" } else { "address-item" },
            input {
                r#type: "radio",
                name: "delivery-address",
                checked: selected,
                onclick: move |_| on_select.call(id),
            }
            strong { "{address.name}" }
            " · {address.phone_number}"
            br {}
            small { "{address.one_line()}" }
        }
    }
}
