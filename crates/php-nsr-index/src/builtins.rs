//! Classes and interfaces shipped with PHP and its bundled extensions.
//!
//! These live in the global namespace, so importing one means importing the
//! bare short name.

/// Built-in class, interface and enum names.
pub const BUILTIN_CLASSES: &[&str] = &[
    // Core
    "stdClass",
    "Closure",
    "Generator",
    "WeakMap",
    "WeakReference",
    "Fiber",
    "Attribute",
    "ReturnTypeWillChange",
    "AllowDynamicProperties",
    "SensitiveParameter",
    "SensitiveParameterValue",
    "Override",
    "UnitEnum",
    "BackedEnum",
    "Traversable",
    "Iterator",
    "IteratorAggregate",
    "ArrayAccess",
    "Countable",
    "Serializable",
    "Stringable",
    "Throwable",
    "Exception",
    "ErrorException",
    "Error",
    "CompileError",
    "ParseError",
    "TypeError",
    "ArgumentCountError",
    "ValueError",
    "ArithmeticError",
    "DivisionByZeroError",
    "UnhandledMatchError",
    "FiberError",
    "__PHP_Incomplete_Class",
    "php_user_filter",
    "Directory",
    "AssertionError",
    // SPL
    "ArrayObject",
    "ArrayIterator",
    "RecursiveArrayIterator",
    "AppendIterator",
    "CachingIterator",
    "RecursiveCachingIterator",
    "CallbackFilterIterator",
    "RecursiveCallbackFilterIterator",
    "DirectoryIterator",
    "FilesystemIterator",
    "RecursiveDirectoryIterator",
    "GlobIterator",
    "EmptyIterator",
    "FilterIterator",
    "RecursiveFilterIterator",
    "ParentIterator",
    "InfiniteIterator",
    "IteratorIterator",
    "LimitIterator",
    "MultipleIterator",
    "NoRewindIterator",
    "OuterIterator",
    "RecursiveIterator",
    "RecursiveIteratorIterator",
    "RecursiveTreeIterator",
    "RegexIterator",
    "RecursiveRegexIterator",
    "SeekableIterator",
    "SplDoublyLinkedList",
    "SplQueue",
    "SplStack",
    "SplHeap",
    "SplMinHeap",
    "SplMaxHeap",
    "SplPriorityQueue",
    "SplFixedArray",
    "SplObjectStorage",
    "SplObserver",
    "SplSubject",
    "SplFileInfo",
    "SplFileObject",
    "SplTempFileObject",
    "BadFunctionCallException",
    "BadMethodCallException",
    "DomainException",
    "InvalidArgumentException",
    "LengthException",
    "LogicException",
    "OutOfBoundsException",
    "OutOfRangeException",
    "OverflowException",
    "RangeException",
    "RuntimeException",
    "UnderflowException",
    "UnexpectedValueException",
    // date
    "DateTime",
    "DateTimeImmutable",
    "DateTimeInterface",
    "DateTimeZone",
    "DateInterval",
    "DatePeriod",
    // json
    "JsonSerializable",
    "JsonException",
    // Reflection
    "Reflection",
    "Reflector",
    "ReflectionException",
    "ReflectionClass",
    "ReflectionObject",
    "ReflectionMethod",
    "ReflectionFunction",
    "ReflectionFunctionAbstract",
    "ReflectionParameter",
    "ReflectionProperty",
    "ReflectionClassConstant",
    "ReflectionNamedType",
    "ReflectionUnionType",
    "ReflectionIntersectionType",
    "ReflectionType",
    "ReflectionGenerator",
    "ReflectionExtension",
    "ReflectionZendExtension",
    "ReflectionReference",
    "ReflectionAttribute",
    "ReflectionEnum",
    "ReflectionEnumUnitCase",
    "ReflectionEnumBackedCase",
    "ReflectionFiber",
    // PDO
    "PDO",
    "PDOStatement",
    "PDOException",
    "PDORow",
    // DOM, XML
    "DOMDocument",
    "DOMElement",
    "DOMNode",
    "DOMNodeList",
    "DOMAttr",
    "DOMText",
    "DOMComment",
    "DOMXPath",
    "DOMException",
    "DOMImplementation",
    "DOMDocumentFragment",
    "DOMNamedNodeMap",
    "DOMCharacterData",
    "DOMCdataSection",
    "DOMProcessingInstruction",
    "SimpleXMLElement",
    "SimpleXMLIterator",
    "XMLReader",
    "XMLWriter",
    "XSLTProcessor",
    "LibXMLError",
    // intl
    "Collator",
    "NumberFormatter",
    "Locale",
    "Normalizer",
    "MessageFormatter",
    "IntlDateFormatter",
    "IntlCalendar",
    "IntlGregorianCalendar",
    "IntlTimeZone",
    "IntlBreakIterator",
    "IntlException",
    "ResourceBundle",
    "Transliterator",
    "Spoofchecker",
    // misc bundled extensions
    "mysqli",
    "mysqli_result",
    "mysqli_stmt",
    "mysqli_sql_exception",
    "SQLite3",
    "SQLite3Stmt",
    "SQLite3Result",
    "CurlHandle",
    "CurlMultiHandle",
    "CURLFile",
    "CURLStringFile",
    "GdImage",
    "HashContext",
    "finfo",
    "ZipArchive",
    "PharData",
    "Phar",
    "PharFileInfo",
    "PharException",
    "SessionHandler",
    "SessionHandlerInterface",
    "SessionIdInterface",
    "SessionUpdateTimestampHandlerInterface",
    "SoapClient",
    "SoapServer",
    "SoapFault",
    "SoapHeader",
    "SoapParam",
    "SoapVar",
    "OpenSSLCertificate",
    "OpenSSLAsymmetricKey",
    "SodiumException",
];

/// Whether `short_name` names a class that lives in the global namespace.
pub fn is_builtin_class(short_name: &str) -> bool {
    BUILTIN_CLASSES.contains(&short_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_builtins() {
        for name in ["DateTime", "Exception", "ArrayAccess", "Closure", "PDO"] {
            assert!(is_builtin_class(name), "{name} should be built in");
        }
    }

    #[test]
    fn test_user_classes_are_not_builtin() {
        assert!(!is_builtin_class("User"));
        assert!(!is_builtin_class("Request"));
        // lookups are case-sensitive
        assert!(!is_builtin_class("datetime"));
    }
}
