//! GraphQL documents.

pub const GET_PRODUCTS: &str = r#"
query GetProducts($first: Int = 20, $after: String) {
  products(first: $first, after: $after) {
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      id
      databaseId
      name
      slug
      description
      shortDescription
      image {
        sourceUrl
        altText
      }
      ... on SimpleProduct {
        price
        regularPrice
        salePrice
        stockStatus
      }
      ... on VariableProduct {
        price
        regularPrice
        salePrice
        stockStatus
      }
      productCategories {
        nodes {
          id
          name
          slug
        }
      }
      reviewCount
      averageRating
      onSale
    }
  }
}
"#;

pub const SEARCH_PRODUCTS: &str = r#"
query SearchProducts($search: String!, $first: Int = 10) {
  products(first: $first, where: { search: $search }) {
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      id
      name
      slug
      image {
        sourceUrl
        altText
      }
      ... on SimpleProduct {
        price
        regularPrice
        salePrice
      }
      ... on VariableProduct {
        price
        regularPrice
        salePrice
      }
    }
  }
}
"#;

pub const GET_PRODUCT_BY_SLUG: &str = r#"
query GetProductBySlug($slug: ID!) {
  product(id: $slug, idType: SLUG) {
    id
    databaseId
    name
    slug
    description
    shortDescription
    image {
      sourceUrl
      altText
    }
    ... on SimpleProduct {
      price
      regularPrice
      salePrice
      stockStatus
    }
    ... on VariableProduct {
      price
      regularPrice
      salePrice
      stockStatus
    }
    productCategories {
      nodes {
        id
        name
        slug
      }
    }
    reviewCount
    averageRating
    onSale
  }
}
"#;

pub const GET_PRODUCT_CATEGORIES: &str = r#"
query GetProductCategories {
  productCategories {
    nodes {
      id
      name
      slug
      description
      image {
        sourceUrl
        altText
      }
      children {
        nodes {
          id
          name
          slug
        }
      }
    }
  }
}
"#;

pub const GET_POSTS: &str = r#"
query GetPosts($first: Int = 10, $after: String) {
  posts(first: $first, after: $after) {
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      id
      title
      slug
      excerpt
      date
      featuredImage {
        node {
          sourceUrl
          altText
        }
      }
      author {
        node {
          name
        }
      }
      categories {
        nodes {
          name
          slug
        }
      }
    }
  }
}
"#;

pub const GET_POST_BY_SLUG: &str = r#"
query GetPostBySlug($slug: ID!) {
  post(id: $slug, idType: SLUG) {
    id
    title
    content
    excerpt
    date
    slug
    featuredImage {
      node {
        sourceUrl
        altText
      }
    }
    author {
      node {
        name
      }
    }
    categories {
      nodes {
        name
        slug
      }
    }
    tags {
      nodes {
        name
        slug
      }
    }
  }
}
"#;

pub const CREATE_ORDER: &str = r#"
mutation CreateOrder($input: CreateOrderInput!) {
  checkout(input: $input) {
    order {
      id
      orderNumber
      total
      status
    }
    paymentUrl
  }
}
"#;
