//! Snapshot tests for generated builders.
//!
//! These tests use insta to capture the exact output of small builders.
//! Run `cargo insta review` to review and accept snapshot changes.

use buildergen::model::QualifiedName;
use buildergen::{generate_builder, Features, GeneratorConfig, SourceLevel, TypeDescriptor};

fn empty() -> TypeDescriptor {
    let mut descriptor = TypeDescriptor::new(QualifiedName::new("com.example", "Empty"));
    descriptor.extensible = false;
    descriptor
}

#[test]
fn snapshot_empty_java8() {
    let config = GeneratorConfig::default().with_generate_docs(false);
    let generated = generate_builder(&empty(), &config).unwrap();

    insta::assert_snapshot!(generated.code, @r#"
    // Autogenerated code. Do not modify.
    package com.example;

    import java.util.Objects;

    abstract class Empty_Builder {

      public Empty.Builder mergeFrom(Empty value) {
        return (Empty.Builder) this;
      }

      public Empty.Builder mergeFrom(Empty.Builder template) {
        return (Empty.Builder) this;
      }

      public Empty.Builder clear() {
        return (Empty.Builder) this;
      }

      public Empty build() {
        return new Empty_Builder.Value(this);
      }

      private static final class Value extends Empty {
        private Value(Empty_Builder builder) {
        }

        @Override
        public boolean equals(Object obj) {
          if (!(obj instanceof Empty_Builder.Value)) {
            return false;
          }
          Empty_Builder.Value other = (Empty_Builder.Value) obj;
          return true;
        }

        @Override
        public int hashCode() {
          return Objects.hash();
        }

        @Override
        public String toString() {
          return "Empty{}";
        }
      }
    }
    "#);
}

#[test]
fn snapshot_empty_java6_serializable() {
    let mut descriptor = empty();
    descriptor.serializable = true;
    let config = GeneratorConfig::default()
        .with_features(Features::new(SourceLevel::Java6, false))
        .with_generate_docs(false)
        .with_generated_annotation(true);
    let generated = generate_builder(&descriptor, &config).unwrap();

    insta::assert_snapshot!(generated.code, @r#"
    // Autogenerated code. Do not modify.
    package com.example;

    import java.io.Serializable;
    import java.util.Arrays;
    import javax.annotation.Generated;

    @Generated("buildergen")
    abstract class Empty_Builder implements Serializable {

      private static final long serialVersionUID = 1L;

      public Empty.Builder mergeFrom(Empty value) {
        return (Empty.Builder) this;
      }

      public Empty.Builder mergeFrom(Empty.Builder template) {
        return (Empty.Builder) this;
      }

      public Empty.Builder clear() {
        return (Empty.Builder) this;
      }

      public Empty build() {
        return new Empty_Builder.Value(this);
      }

      private static final class Value extends Empty {
        private Value(Empty_Builder builder) {
        }

        @Override
        public boolean equals(Object obj) {
          if (!(obj instanceof Empty_Builder.Value)) {
            return false;
          }
          Empty_Builder.Value other = (Empty_Builder.Value) obj;
          return true;
        }

        @Override
        public int hashCode() {
          return Arrays.hashCode(new Object[] {});
        }

        @Override
        public String toString() {
          return "Empty{}";
        }
      }
    }
    "#);
}
