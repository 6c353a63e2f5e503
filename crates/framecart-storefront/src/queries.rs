//! GraphQL documents for the Storefront cart API.

/// Fields fetched for every cart, shared by all operations.
const CART_FIELDS: &str = "
  id
  checkoutUrl
  cost {
    totalAmount {
      amount
      currencyCode
    }
  }
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        merchandise {
          ... on ProductVariant {
            id
            title
            price {
              amount
              currencyCode
            }
            product {
              title
            }
          }
        }
        attributes {
          key
          value
        }
      }
    }
  }
";

pub fn cart_create_mutation() -> String {
    format!(
        "mutation cartCreate($input: CartInput!) {{
  cartCreate(input: $input) {{
    cart {{{CART_FIELDS}}}
    userErrors {{
      field
      message
    }}
  }}
}}"
    )
}

pub fn cart_lines_add_mutation() -> String {
    format!(
        "mutation cartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {{
  cartLinesAdd(cartId: $cartId, lines: $lines) {{
    cart {{{CART_FIELDS}}}
    userErrors {{
      field
      message
    }}
  }}
}}"
    )
}

pub fn cart_lines_update_mutation() -> String {
    format!(
        "mutation cartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) {{
  cartLinesUpdate(cartId: $cartId, lines: $lines) {{
    cart {{{CART_FIELDS}}}
    userErrors {{
      field
      message
    }}
  }}
}}"
    )
}

pub fn cart_lines_remove_mutation() -> String {
    format!(
        "mutation cartLinesRemove($cartId: ID!, $lineIds: [ID!]!) {{
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {{
    cart {{{CART_FIELDS}}}
    userErrors {{
      field
      message
    }}
  }}
}}"
    )
}

pub fn cart_query() -> String {
    format!(
        "query getCart($id: ID!) {{
  cart(id: $id) {{{CART_FIELDS}}}
}}"
    )
}
